//! Staybook CLI - inspect and edit the local session and favorites store.
//!
//! # Usage
//!
//! ```bash
//! # Sign in against the booking API and store the session
//! staybook session login -e guest@example.com -p secret
//!
//! # Show what the storefront would render and what the guard would decide
//! staybook session show
//! staybook guard route /admin/bookings
//!
//! # Manage favorites
//! staybook favorites toggle acc-42
//! staybook favorites list
//! ```
//!
//! # Commands
//!
//! - `session` - Sign in, sign out, import a token, replace the profile
//! - `favorites` - Add, remove, toggle, check, list and clear favorites
//! - `guard` - Evaluate route admission against the stored session

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use secrecy::SecretString;
use staybook_core::AccessLevel;
use staybook_storefront::config::DEFAULT_STORE_PATH;
use staybook_storefront::storage::FileStore;
use url::Url;

mod commands;

#[derive(Parser)]
#[command(name = "staybook")]
#[command(author, version, about = "Staybook CLI tools")]
struct Cli {
    /// Durable store file shared with the storefront
    #[arg(long, global = true, env = "STAYBOOK_STORE_PATH", default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the stored session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Evaluate route admission
    Guard {
        #[command(subcommand)]
        action: GuardAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Sign in through the booking API
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "STAYBOOK_PASSWORD", hide_env_values = true)]
        password: SecretString,

        /// Booking API base URL
        #[arg(long, env = "STAYBOOK_API_URL")]
        api_url: Url,
    },
    /// Store an existing token, with an optional profile JSON file
    Import {
        /// Bearer token
        #[arg(short, long)]
        token: String,

        /// Profile JSON file
        #[arg(long)]
        profile: Option<PathBuf>,
    },
    /// Sign out
    Logout,
    /// Show the stored session (never the token)
    Show,
    /// Replace the stored profile with a JSON file
    UpdateUser {
        /// Profile JSON file
        #[arg(long)]
        profile: PathBuf,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// Add an item
    Add { id: String },
    /// Remove an item
    Remove { id: String },
    /// Add an item if absent, remove it if present
    Toggle { id: String },
    /// Check whether an item is a favorite
    Check { id: String },
    /// List favorites in the order they were added
    List,
    /// Remove every favorite
    Clear,
}

#[derive(Subcommand)]
enum GuardAction {
    /// Evaluate an access level
    Check {
        #[arg(value_enum)]
        access: AccessArg,
    },
    /// Evaluate the access level a page path needs
    Route { path: String },
}

/// Access level as typed on the command line.
#[derive(Clone, Copy, ValueEnum)]
enum AccessArg {
    Authenticated,
    Admin,
}

impl From<AccessArg> for AccessLevel {
    fn from(arg: AccessArg) -> Self {
        match arg {
            AccessArg::Authenticated => Self::Authenticated,
            AccessArg::Admin => Self::Admin,
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let store = Arc::new(FileStore::open(&cli.store)?);
    tracing::debug!(path = %store.path().display(), "Store opened");

    let output = match cli.command {
        Commands::Session { action } => match action {
            SessionAction::Login {
                email,
                password,
                api_url,
            } => commands::session::login(store, &api_url, &email, &password).await?,
            SessionAction::Import { token, profile } => {
                commands::session::import(store, &token, profile.as_deref())?
            }
            SessionAction::Logout => commands::session::logout(store)?,
            SessionAction::Show => commands::session::show(store)?,
            SessionAction::UpdateUser { profile } => {
                commands::session::update_user(store, &profile)?
            }
        },
        Commands::Favorites { action } => match action {
            FavoritesAction::Add { id } => commands::favorites::add(store, &id)?,
            FavoritesAction::Remove { id } => commands::favorites::remove(store, &id)?,
            FavoritesAction::Toggle { id } => commands::favorites::toggle(store, &id)?,
            FavoritesAction::Check { id } => commands::favorites::check(store, &id),
            FavoritesAction::List => commands::favorites::list(store),
            FavoritesAction::Clear => commands::favorites::clear(store)?,
        },
        Commands::Guard { action } => match action {
            GuardAction::Check { access } => commands::guard::check(store, access.into()),
            GuardAction::Route { path } => commands::guard::route(store, &path),
        },
    };

    println!("{output}");
    Ok(())
}
