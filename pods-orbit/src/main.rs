//! pods-orbit - Orbit member import
//!
//! Loads configuration, opens the note database and runs one import.

use anyhow::{Context, Result};
use clap::Parser;
use pods_common::config::LoggingConfig;
use pods_common::db::{init_database, SqliteNoteStore};
use pods_orbit::config::{CliArgs, PodConfig};
use pods_orbit::decision::{DecisionProvider, ScriptedDecisions, TerminalPrompt};
use pods_orbit::import::{ImportReport, OrbitImportPipeline};
use pods_orbit::services::OrbitClient;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let config_path = args.config_path();
    let config = PodConfig::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    init_logging(&config.logging)?;

    let settings = config.resolve(&args).context("Invalid configuration")?;
    info!(
        workspace = %settings.client.workspace,
        vault = %settings.options.vault,
        database = %settings.database_path.display(),
        "Starting pods-orbit"
    );

    let pool = init_database(&settings.database_path)
        .await
        .context("Failed to open note database")?;
    let store = SqliteNoteStore::new(pool);

    let client = OrbitClient::new(settings.client.clone()).context("Failed to create Orbit client")?;

    let decisions: Box<dyn DecisionProvider> = match settings.decisions.clone() {
        Some(answers) => Box::new(ScriptedDecisions::new(answers)),
        None => Box::new(TerminalPrompt),
    };

    let report = OrbitImportPipeline::new(&client, &store, decisions.as_ref(), settings.options)
        .run()
        .await
        .context("Orbit import failed")?;

    print_summary(&report);
    Ok(())
}

/// stderr by default; the configured file instead when set. `RUST_LOG` wins
/// over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pods_orbit={0},pods_common={0}", logging.level)));

    let (file_layer, stderr_layer) = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

fn print_summary(report: &ImportReport) {
    let stats = &report.stats;
    println!(
        "Fetched {} member(s): {} created, {} updated, {} unchanged, {} duplicate(s)",
        stats.fetched, stats.created, stats.updated, stats.unchanged, stats.duplicates
    );
    if stats.conflicts > 0 {
        println!(
            "Conflicts: {} ({} overwritten, {} skipped, {} not visited, {} undecided)",
            stats.conflicts, stats.overwritten, stats.skipped, stats.not_visited, stats.undecided
        );
    }
    for node in report.nodes() {
        println!("  {}", node.fname);
    }
}
