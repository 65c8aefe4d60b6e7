//! Terminal front end for the todo list.
//!
//! Every command loads the owner's list, performs one operation through
//! `TodoSync`, and prints the resulting view.
//!
//! ## Usage
//!
//! ```bash
//! export TODO_USER_ID=42
//! todo list --filter active
//! todo add "Buy milk"
//! todo rename 7 "Buy oat milk"
//! todo toggle 7
//! todo remove 7
//! todo toggle-all
//! todo clear-completed
//! ```

mod render;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use todo_sync::config::{ENV_API_URL, ENV_USER_ID};
use todo_sync::{BatchOutcome, Config, HttpStore, Status, TodoClient, TodoId, TodoSync};
use tracing::debug;

/// Single-list todo tracker
#[derive(Parser)]
#[command(name = "todo")]
#[command(version)]
#[command(about = "Manage your todo list on a remote todo server")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Base URL of the todo server (overrides TODO_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Owner id (overrides TODO_USER_ID)
    #[arg(long, global = true)]
    user_id: Option<i64>,

    /// Which todos to show: all, active, or completed
    #[arg(short, long, global = true, default_value = "all")]
    filter: Status,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the list
    List,

    /// Add a todo
    Add { title: String },

    /// Change a todo's title; an empty title deletes it
    Rename { id: i64, title: String },

    /// Flip a todo between active and completed
    Toggle { id: i64 },

    /// Delete a todo
    Remove { id: i64 },

    /// Complete every active todo
    ToggleAll,

    /// Delete every completed todo
    ClearCompleted,
}

fn setup_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

/// Flags win over the environment.
fn load_config(cli: &Cli) -> Result<Config, todo_sync::ConfigError> {
    Config::from_lookup(|key| {
        let flag = match key {
            ENV_API_URL => cli.api_url.clone(),
            ENV_USER_ID => cli.user_id.map(|id| id.to_string()),
            _ => None,
        };
        flag.or_else(|| std::env::var(key).ok())
    })
}

fn batch_result(outcome: BatchOutcome) -> Result<()> {
    if outcome.is_success() {
        return Ok(());
    }
    bail!(
        "{} of {} items failed",
        outcome.failed.len(),
        outcome.failed.len() + outcome.applied.len()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    // No owner id means no remote calls at all.
    let config = load_config(&cli)?;
    debug!(base_url = %config.base_url, user_id = %config.user_id, "starting");

    let store = HttpStore::over_ureq(TodoClient::new(&config.base_url, config.user_id));
    let sync = TodoSync::new(store, &config);
    sync.set_status_filter(cli.filter).await;

    if let Err(err) = sync.load().await {
        print!("{}", render::render(&sync.snapshot().await));
        return Err(err.into());
    }

    let result: Result<()> = match cli.command {
        Commands::List => Ok(()),
        Commands::Add { title } => sync
            .create(sync.draft(title))
            .await
            .map(drop)
            .map_err(Into::into),
        Commands::Rename { id, title } => sync
            .rename(TodoId(id), &title)
            .await
            .map(drop)
            .map_err(Into::into),
        Commands::Toggle { id } => sync.toggle(TodoId(id)).await.map(drop).map_err(Into::into),
        Commands::Remove { id } => sync.delete(TodoId(id)).await.map_err(Into::into),
        Commands::ToggleAll => batch_result(sync.toggle_all().await),
        Commands::ClearCompleted => batch_result(sync.clear_completed().await),
    };

    print!("{}", render::render(&sync.snapshot().await));
    result
}
