//! Blue Flame CLI - Browse the menu and place orders from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List the whole menu
//! bf-cli menu
//!
//! # List one category
//! bf-cli menu --category Burgers
//!
//! # List categories
//! bf-cli categories
//!
//! # Place an order (two of item 1, one of item 4)
//! bf-cli order -n "Ada Lovelace" -e ada@example.com -a "1 Flame St" -i 1:2 -i 4
//! ```
//!
//! # Configuration
//!
//! - `BLUE_FLAME_BACKEND_URL` - Backend base URL (default `http://localhost:8000`)
//! - `BLUE_FLAME_REQUEST_TIMEOUT_SECS` - Per-request timeout (default 30)
//! - `SENTRY_DSN` - Enables error reporting when set
//! - `RUST_LOG` - Log filter

#![cfg_attr(not(test), forbid(unsafe_code))]

use blue_flame_ordering::{HttpBackend, OrderSession, OrderingConfig};
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::order::{CustomerArgs, ItemSpec};

#[derive(Parser)]
#[command(name = "bf-cli")]
#[command(author, version, about = "Blue Flame Kitchen ordering")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List menu items
    Menu {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List menu categories
    Categories,
    /// Place an order
    Order {
        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Customer email
        #[arg(short, long)]
        email: String,

        /// Delivery address
        #[arg(short, long)]
        address: String,

        /// Menu item as `ID` or `ID:QTY`; repeat for more items
        #[arg(short, long = "item", value_name = "ID[:QTY]", required = true)]
        items: Vec<ItemSpec>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &OrderingConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Errors become events, lower levels become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "blue_flame_ordering=info,bf_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    // Sentry needs the DSN before tracing is wired up
    let config = OrderingConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);

    init_tracing();
    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &OrderingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let backend = HttpBackend::new(config)?;
    tracing::debug!(backend = %backend.base_url(), "Using backend");
    let mut session = OrderSession::new(backend);

    match cli.command {
        Commands::Menu { category } => {
            commands::menu::list(&mut session, category.as_deref()).await?;
        }
        Commands::Categories => commands::menu::categories(&mut session).await?,
        Commands::Order {
            name,
            email,
            address,
            items,
        } => {
            let customer = CustomerArgs {
                name,
                email,
                address,
            };
            commands::order::place(&mut session, &customer, &items).await?;
        }
    }
    Ok(())
}
