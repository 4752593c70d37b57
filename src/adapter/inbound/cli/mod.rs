//! CLI wiring: constructs the gateway, stores, and synchronizers
//! explicitly and dispatches subcommands against them.

pub mod command;
pub mod output;

use std::sync::Arc;

use dialoguer::Password;

use crate::adapter::outbound::http::HttpCatalogGateway;
use crate::adapter::outbound::store::FileCredentialStore;
use crate::application::{CollectionSync, SessionStore};
use crate::config::Config;
use crate::domain::{CollectionKind, SubscriptionTier, WineId};
use crate::error::{Error, Result};

pub use command::{Cli, CollectionAction, Command, MembershipAction, WineAction};

type Gateway = HttpCatalogGateway;
type Session = SessionStore<Gateway, FileCredentialStore>;

/// Execute a parsed CLI invocation.
pub async fn run(cli: Cli, config: &Config) -> Result<()> {
    if let Err(err) = crate::config::paths::ensure_home_dir() {
        tracing::warn!(error = %err, "could not create home directory");
    }

    let gateway = Arc::new(Gateway::new(
        config.api.base_url.clone(),
        config.request_timeout(),
    )?);
    let store = Arc::new(FileCredentialStore::default_location());
    let session = SessionStore::new(Arc::clone(&gateway), store)
        .with_settle_delay(config.settle_delay());
    session.recover().await;

    match cli.command {
        Command::Login { email } => {
            let password = prompt_password("Password")?;
            let state = session.login(&email, &password).await?;
            output::success(&format!(
                "logged in as {}",
                state.user().map_or(email.as_str(), |u| u.email.as_str())
            ));
        }
        Command::Register { email, name } => {
            let password = prompt_password("Choose a password")?;
            session.register(&email, &password, &name).await?;
            output::success(&format!("registered and logged in as {email}"));
        }
        Command::Logout => {
            session.logout().await;
            output::success("logged out");
        }
        Command::Whoami => {
            output::render_session(&session.session());
        }
        Command::Favorites { action } => {
            collection(&session, &gateway, CollectionKind::Favorites, action).await?;
        }
        Command::History { action } => {
            collection(&session, &gateway, CollectionKind::History, action).await?;
        }
        Command::Membership { action } => {
            let tier = match action {
                MembershipAction::Upgrade => SubscriptionTier::Sommelier,
                MembershipAction::Downgrade => SubscriptionTier::User,
            };
            let state = session.change_tier(tier).await?;
            let role = state.user().map_or("?", |u| u.role.as_str());
            output::success(&format!("membership is now {role}"));
        }
        Command::Wines { action } => {
            wines(&session, &gateway, action).await?;
        }
    }
    Ok(())
}

async fn collection(
    session: &Session,
    gateway: &Arc<Gateway>,
    kind: CollectionKind,
    action: CollectionAction,
) -> Result<()> {
    let sync = CollectionSync::new(kind, Arc::clone(gateway), session.subscribe());

    // Initial load; a failed read degrades to an empty set with an
    // inline notice rather than aborting the command.
    if sync.reload().await.is_err() {
        if let crate::application::SyncStatus::Error(message) = sync.status() {
            output::notice(&format!("could not load {kind}: {message}"));
        }
    }

    match action {
        CollectionAction::List => {
            output::render_members(&kind.to_string(), &sync.member_ids(), &sync.status());
        }
        CollectionAction::Toggle { id } => {
            let id = WineId::new(id);
            let now_member = sync.toggle(id.clone()).await?;
            if now_member {
                output::success(&format!("{id} added to {kind}"));
            } else {
                output::success(&format!("{id} removed from {kind}"));
            }
        }
        CollectionAction::Refresh => {
            sync.refresh().await?;
            output::success(&format!("{kind} refreshed ({})", sync.member_ids().len()));
        }
    }
    Ok(())
}

async fn wines(session: &Session, gateway: &Arc<Gateway>, action: WineAction) -> Result<()> {
    use crate::port::outbound::gateway::CatalogGateway;

    match action {
        WineAction::List => {
            let wines = gateway.list_wines().await?;
            if wines.is_empty() {
                println!("catalog is empty");
            }
            for wine in &wines {
                output::render_wine(wine);
            }
        }
        WineAction::Show { id } => {
            let wine = gateway.wine_by_id(&WineId::new(id)).await?;
            output::render_wine(&wine);
        }
        WineAction::Month => {
            let wine = gateway.wine_of_month().await?;
            output::render_wine(&wine);
        }
        WineAction::Rate { id, score, review } => {
            let token = session.token().ok_or(Error::AuthRequired)?;
            gateway
                .rate_wine(&WineId::new(id), score, &review, &token)
                .await?;
            output::success("rating submitted");
        }
    }
    Ok(())
}

fn prompt_password(prompt: &str) -> Result<String> {
    Ok(Password::new().with_prompt(prompt).interact()?)
}
