//! # TedTrack — TED agreement deadline tracker
//!
//! Keeps one processed spreadsheet of transfer agreements and emails
//! bundled notices when warning, end-of-effectiveness, or accounting
//! deadlines arrive.
//!
//! Usage:
//!   tedtrack import planilha.xlsx        # Load, process, and save a sheet
//!   tedtrack show                        # Print the saved table
//!   tedtrack check --date 15/03/2030     # Run one check now
//!   tedtrack run                         # Daily checks until Ctrl-C
//!   tedtrack delete                      # Remove the saved artifact

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tedtrack_core::{TedTrackConfig, TedTrackError};
use tedtrack_notify::{LogNotifier, Notifier, SmtpNotifier};
use tedtrack_scheduler::{ScheduleContext, TaskSupervisor, run_once, today_str};
use tedtrack_table::processor::parse_date;
use tedtrack_table::{COLUMN_LABELS, TableStore, format_date, load_path, process};

#[derive(Parser)]
#[command(
    name = "tedtrack",
    version,
    about = "📅 TedTrack — TED agreement deadline tracker"
)]
struct Cli {
    /// Config file path (default: ~/.tedtrack/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Artifact path override
    #[arg(long)]
    artifact: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a spreadsheet, derive deadlines, and save the artifact
    Import {
        /// Path of the .xlsx upload
        file: PathBuf,
    },
    /// Print the saved table
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run one deadline check now
    Check {
        /// Check against this date (dd/mm/yyyy) instead of today
        #[arg(long)]
        date: Option<String>,
        /// Log notifications instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
    /// Check daily at the configured time until Ctrl-C
    Run,
    /// Remove the saved artifact
    Delete,
    /// Show artifact and mail configuration
    Status,
}

fn expand_path(p: &str) -> String {
    shellexpand::tilde(p).to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => {
            let mut config = TedTrackConfig::load_from(path)?;
            config.apply_env_overrides();
            config
        }
        None => TedTrackConfig::load()?,
    };

    let artifact = cli
        .artifact
        .clone()
        .unwrap_or_else(|| config.storage.artifact.clone());
    let store = TableStore::new(expand_path(&artifact));

    match cli.command {
        Command::Import { file } => import(&store, &file),
        Command::Show { json } => show(&store, json),
        Command::Check { date, dry_run } => check(&store, &config, date, dry_run).await,
        Command::Run => run(store, config).await,
        Command::Delete => {
            if store.delete() {
                println!("🗑️ Artifact removed: {}", store.path().display());
            } else {
                println!("📭 No artifact at {}", store.path().display());
            }
            Ok(())
        }
        Command::Status => status(&store, &config),
    }
}

fn import(store: &TableStore, file: &Path) -> Result<()> {
    let raw = load_path(file)?;
    let table = process(&raw)?;
    let dropped = raw.rows.len() - table.len();

    if !store.save(&table) {
        anyhow::bail!("Failed to save artifact to {}", store.path().display());
    }
    println!(
        "✅ Imported {} record(s), {} row(s) dropped for missing end dates",
        table.len(),
        dropped
    );
    println!("   💾 Artifact: {}", store.path().display());
    Ok(())
}

fn show(store: &TableStore, json: bool) -> Result<()> {
    let Some(table) = store.load() else {
        anyhow::bail!("No saved artifact at {}", store.path().display());
    };

    if json {
        let rows: Vec<serde_json::Value> = table
            .records
            .iter()
            .map(|record| {
                COLUMN_LABELS
                    .iter()
                    .zip(record.to_cells())
                    .map(|(label, cell)| ((*label).to_string(), serde_json::Value::String(cell)))
                    .collect::<serde_json::Map<_, _>>()
                    .into()
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{}", COLUMN_LABELS.join(" | "));
        for record in &table.records {
            println!("{}", record.to_cells().join(" | "));
        }
        println!();
        println!("{} record(s)", table.len());
    }
    Ok(())
}

async fn check(
    store: &TableStore,
    config: &TedTrackConfig,
    date: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let Some(table) = store.load() else {
        anyhow::bail!("No saved artifact at {}", store.path().display());
    };

    let notifier: Arc<dyn Notifier> = if dry_run {
        Arc::new(LogNotifier)
    } else {
        warn_on_missing_password(config);
        Arc::new(SmtpNotifier::new(config.mail.clone()))
    };

    let today = match date {
        Some(d) => {
            let parsed = parse_date(&d)
                .ok_or_else(|| anyhow::anyhow!("Invalid date '{d}', expected dd/mm/yyyy"))?;
            format_date(parsed)
        }
        None => today_str(),
    };

    let triggered = run_once(&table, &today, notifier.as_ref()).await;
    if triggered.is_empty() {
        println!("📭 Nothing due on {today}");
    } else {
        for t in &triggered {
            let mark = if t.sent { "✅" } else { "❌" };
            println!("{mark} {}: {} record(s)", t.column, t.matches);
        }
    }
    Ok(())
}

async fn run(store: TableStore, config: TedTrackConfig) -> Result<()> {
    warn_on_missing_password(&config);

    let notifier: Arc<dyn Notifier> = Arc::new(SmtpNotifier::new(config.mail.clone()));
    let supervisor = TaskSupervisor::new(ScheduleContext {
        store,
        notifier,
        daily_at: config.schedule.daily_at.clone(),
        poll_interval_secs: config.schedule.poll_interval_secs,
    });

    if !supervisor.start().await {
        return Err(TedTrackError::TaskConflict(
            "could not start the check task, already running or no saved artifact".into(),
        )
        .into());
    }

    println!("📅 TedTrack v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "   ⏰ Daily check at {} (poll every {}s)",
        config.schedule.daily_at, config.schedule.poll_interval_secs
    );
    if let Some(started) = supervisor.status().await.started_at {
        println!("   ▶️ Started: {started}");
    }
    println!("   Press Ctrl-C to stop.");

    tokio::signal::ctrl_c().await?;
    println!();
    supervisor.stop().await;
    println!("🛑 Stopped.");
    Ok(())
}

fn status(store: &TableStore, config: &TedTrackConfig) -> Result<()> {
    println!("📅 TedTrack v{}", env!("CARGO_PKG_VERSION"));
    println!("   💾 Artifact: {}", store.path().display());
    match store.load() {
        Some(table) => println!("   📊 {} record(s) saved", table.len()),
        None => println!("   📭 No saved artifact"),
    }
    println!(
        "   📧 {} → {} via {}:{}",
        config.mail.sender, config.mail.recipient, config.mail.smtp_host, config.mail.smtp_port
    );
    println!("   ⏰ Daily check at {}", config.schedule.daily_at);
    Ok(())
}

fn warn_on_missing_password(config: &TedTrackConfig) {
    if config.mail.password.is_empty() {
        tracing::warn!(
            "⚠️ No mail password configured; sends will fail. Set TEDTRACK_MAIL_PASSWORD."
        );
    }
}
