use clap::Parser;
use decanter::adapter::inbound::cli::{self, Cli};
use decanter::config::{paths, Config};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(paths::default_config);
    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(2);
        }
    };

    config.init_logging();

    if let Err(e) = cli::run(cli, &config).await {
        cli::output::failure(&e);
        std::process::exit(1);
    }
}
