//! CLI command definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Wine catalog client: browse the catalog, manage favorites and
/// history, and handle your account.
#[derive(Debug, Parser)]
#[command(name = "decanter", version, about)]
pub struct Cli {
    /// Path to the config file (default: ~/.decanter/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with an email; prompts for the password.
    Login {
        email: String,
    },
    /// Create an account, then log in.
    Register {
        email: String,
        /// Display name for the new account.
        #[arg(long)]
        name: String,
    },
    /// Drop the current session.
    Logout,
    /// Show the current session.
    Whoami,
    /// Manage the favorites collection.
    Favorites {
        #[command(subcommand)]
        action: CollectionAction,
    },
    /// Manage the tasting history collection.
    History {
        #[command(subcommand)]
        action: CollectionAction,
    },
    /// Change subscription tier.
    Membership {
        #[command(subcommand)]
        action: MembershipAction,
    },
    /// Browse the wine catalog.
    Wines {
        #[command(subcommand)]
        action: WineAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum CollectionAction {
    /// List member ids in server order.
    List,
    /// Flip membership of a wine id.
    Toggle { id: String },
    /// Force a resync with the server.
    Refresh,
}

#[derive(Debug, Subcommand)]
pub enum MembershipAction {
    /// Upgrade to the sommelier tier.
    Upgrade,
    /// Downgrade to the regular tier.
    Downgrade,
}

#[derive(Debug, Subcommand)]
pub enum WineAction {
    /// List the full catalog.
    List,
    /// Show one wine's detail record.
    Show { id: String },
    /// Show the wine of the month.
    Month,
    /// Rate a wine (requires login).
    Rate {
        id: String,
        #[arg(long)]
        score: u8,
        #[arg(long, default_value = "")]
        review: String,
    },
}
