//! Command-line front end for the review store.
//!
//! # Responsibility
//! - Map subcommands onto `recall_core` service calls.
//! - Resolve configuration from flags layered over `RECALL_*` variables.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use recall_core::config::normalize_level;
use recall_core::{init_logging, RecallConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recall", about = "Spaced-repetition review tracker", version)]
struct Cli {
    /// SQLite database file (overrides RECALL_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level (overrides RECALL_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling logs (overrides RECALL_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Track a new item and schedule its reviews
    Add {
        /// Item title, e.g. "LC 43"
        title: String,
    },

    /// List reviews due on a date
    Due {
        /// Calendar date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Flip a review between open and completed
    Toggle {
        /// Review id
        review_id: String,
    },

    /// Read or write structured notes
    #[command(subcommand)]
    Notes(NotesCommand),

    /// Outstanding review counts per date
    Calendar {
        /// First date to include (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<String>,
        /// Last date to include (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<String>,
    },

    /// List every item with its review schedule
    List,
}

#[derive(Subcommand)]
enum NotesCommand {
    /// Show decoded notes for an item
    Show {
        /// Item id
        item_id: String,
    },
    /// Replace notes for an item; omitted fields keep their current value
    Set {
        /// Item id
        item_id: String,
        /// Brute-force approach text
        #[arg(long)]
        brute_force: Option<String>,
        /// Optimized approach text
        #[arg(long)]
        optimized: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(config.log_level, log_dir).context("failed to initialize logging")?;
    }

    let mut conn = recall_core::db::open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let format = cli.format;

    match cli.command {
        Command::Add { title } => commands::add(&mut conn, &title, format),
        Command::Due { date } => commands::due(&mut conn, date.as_deref(), format),
        Command::Toggle { review_id } => commands::toggle(&mut conn, &review_id, format),
        Command::Notes(NotesCommand::Show { item_id }) => {
            commands::notes_show(&mut conn, &item_id, format)
        }
        Command::Notes(NotesCommand::Set {
            item_id,
            brute_force,
            optimized,
        }) => commands::notes_set(&mut conn, &item_id, brute_force, optimized),
        Command::Calendar { from, to } => {
            commands::calendar(&mut conn, from.as_deref(), to.as_deref(), format)
        }
        Command::List => commands::list(&mut conn, format),
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<RecallConfig> {
    let mut config = RecallConfig::from_env()?;
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }
    if let Some(level) = cli.log_level.as_deref() {
        config.log_level = normalize_level(level)
            .with_context(|| format!("unsupported log level `{level}`"))?;
    }
    if let Some(log_dir) = cli.log_dir.clone() {
        config.log_dir = Some(log_dir);
    }
    Ok(config)
}
