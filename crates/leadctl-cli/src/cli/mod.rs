//! CLI entry and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use leadctl_core::api::ApiClient;
use leadctl_core::api::types::LeadDraft;
use leadctl_core::config::Config;
use leadctl_core::leads::{ListQuery, PerPage, SortBy, SortOrder};
use leadctl_core::store::SessionStore;

use crate::{logging, modes};

mod commands;

#[derive(Parser)]
#[command(name = "leadctl")]
#[command(version = "1.0.0")]
#[command(about = "Terminal console for the lead backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL (overrides LEADCTL_BASE_URL and the config file)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and persist the session token
    Login {
        /// Account email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Log out and clear the persisted session token
    Logout,
    /// Show the account behind the persisted session
    Whoami,
    /// Create a new account
    Register,
    /// Browse and edit leads
    Leads {
        #[command(subcommand)]
        command: LeadsCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum LeadsCommands {
    /// List leads, one page at a time
    List {
        /// Page to fetch
        #[arg(long, default_value = "1")]
        page: u32,

        /// Rows per page (10, 20 or 50)
        #[arg(long, default_value = "10", value_name = "N")]
        per_page: PerPage,

        /// Free-text filter over name, email and phone
        #[arg(long)]
        search: Option<String>,

        /// Restrict to a single status id
        #[arg(long, value_name = "ID")]
        status: Option<u64>,

        /// Sort column (name, email, phone or status)
        #[arg(long, default_value = "name", value_name = "COLUMN")]
        sort_by: SortBy,

        /// Sort direction (asc or desc)
        #[arg(long, default_value = "asc", value_name = "ORDER")]
        sort_order: SortOrder,
    },
    /// List the configured lead statuses
    Statuses,
    /// Create a lead
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: Option<String>,

        /// Status id to assign
        #[arg(long, value_name = "ID")]
        status: Option<u64>,
    },
    /// Replace an existing lead
    Update {
        /// Id of the lead to update
        #[arg(value_name = "ID")]
        id: u64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: Option<String>,

        /// Status id to assign
        #[arg(long, value_name = "ID")]
        status: Option<u64>,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the backend base URL in the config file
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;

    let Cli { command, base_url } = cli;

    let make_client = || -> Result<ApiClient> {
        let url = base_url
            .clone()
            .unwrap_or_else(|| config.effective_base_url());
        ApiClient::new(&url)
    };

    let session_path = SessionStore::store_path();

    // default to the full-screen console
    let Some(command) = command else {
        let _guard = logging::init_console()?;
        return modes::run_console(Arc::new(make_client()?), session_path).await;
    };

    logging::init_cli();

    match command {
        Commands::Login { email } => {
            commands::auth::login(&make_client()?, &session_path, email).await
        }
        Commands::Logout => commands::auth::logout(&make_client()?, &session_path).await,
        Commands::Whoami => commands::auth::whoami(&make_client()?, &session_path).await,
        Commands::Register => commands::auth::register(&make_client()?).await,

        Commands::Leads { command } => {
            let client = make_client()?;
            commands::auth::require_session(&client, &session_path)?;
            match command {
                LeadsCommands::List {
                    page,
                    per_page,
                    search,
                    status,
                    sort_by,
                    sort_order,
                } => {
                    let query = ListQuery {
                        page,
                        per_page,
                        search: search.unwrap_or_default(),
                        status,
                        sort_by,
                        sort_order,
                    };
                    commands::leads::list(&client, &query).await
                }
                LeadsCommands::Statuses => commands::leads::statuses(&client).await,
                LeadsCommands::Create {
                    name,
                    email,
                    phone,
                    status,
                } => {
                    let draft = LeadDraft {
                        name,
                        email,
                        phone,
                        lead_status_id: status,
                    };
                    commands::leads::create(&client, &draft).await
                }
                LeadsCommands::Update {
                    id,
                    name,
                    email,
                    phone,
                    status,
                } => {
                    let draft = LeadDraft {
                        name,
                        email,
                        phone,
                        lead_status_id: status,
                    };
                    commands::leads::update(&client, id, &draft).await
                }
            }
        }

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
        },
    }
}
