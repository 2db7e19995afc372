//! bookscan CLI
//!
//! Local execution entry point. Platform adapters export items to JSONL
//! files; this binary runs the scan and double-check pipelines over them.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bookscan::{
    error::Result,
    models::Config,
    pipeline::{self, CheckMode, ScanContext},
    report::LogReporter,
    services::BookResolver,
    source::{JsonlFetcher, JsonlSource},
    store::{CsvStore, RecordStore},
};
use clap::{Parser, Subcommand, ValueEnum};

/// bookscan - Book Mention Scanner
#[derive(Parser, Debug)]
#[command(
    name = "bookscan",
    version,
    about = "Scans platform items for book mentions and maintains an enriched record table"
)]
struct Cli {
    /// Path to data directory containing config and the record table
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan adapter-exported items for book mentions
    Scan {
        /// Path to the item file (one JSON object per line)
        #[arg(long)]
        items: PathBuf,
    },

    /// Re-enrich persisted rows from their original items
    DoubleCheck {
        /// Which rows to revisit
        #[arg(long, value_enum, default_value = "missing")]
        mode: ModeArg,

        /// Item snapshot used to re-fetch rows by permalink
        #[arg(long)]
        items: PathBuf,
    },

    /// Validate configuration files
    Validate,

    /// Show record table info
    Info,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ModeArg {
    /// Only rows still missing ISBN, tags, or cover
    Missing,
    /// Every row
    All,
}

impl From<ModeArg> for CheckMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Missing => CheckMode::Missing,
            ModeArg::All => CheckMode::All,
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Wire Ctrl-C to the cooperative stop flag.
fn spawn_interrupt_handler(stop: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received; stopping at the next item boundary");
            stop.store(true, Ordering::Relaxed);
        }
    });
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("bookscan starting...");

    let config_path = cli.data_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);

    let store = CsvStore::new(cli.data_dir.join(&config.store.csv_file));
    let reporter = LogReporter;
    let stop = Arc::new(AtomicBool::new(false));

    match cli.command {
        Command::Scan { items } => {
            config.validate()?;
            spawn_interrupt_handler(Arc::clone(&stop));

            let resolver = BookResolver::new(&config.scanner.user_agent, config.resolver.clone())?;
            let mut source = JsonlSource::open(&items)?;
            let ctx = ScanContext {
                config: &config,
                resolver: &resolver,
                store: &store,
                reporter: &reporter,
                stop: &stop,
            };

            let summary = pipeline::run_scan(&ctx, &mut source).await?;
            log::info!("Scan complete: {}", summary);
        }

        Command::DoubleCheck { mode, items } => {
            config.validate()?;
            spawn_interrupt_handler(Arc::clone(&stop));

            let resolver = BookResolver::new(&config.scanner.user_agent, config.resolver.clone())?;
            let fetcher = JsonlFetcher::open(&items)?;
            log::info!("Loaded {} items for permalink lookup", fetcher.len());

            let ctx = ScanContext {
                config: &config,
                resolver: &resolver,
                store: &store,
                reporter: &reporter,
                stop: &stop,
            };

            let summary = pipeline::run_double_check(&ctx, &fetcher, mode.into()).await?;
            log::info!("Double-check complete: {}", summary);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Data directory: {}", cli.data_dir.display());
            log::info!("Record table: {}", store.path().display());

            if store.path().exists() {
                let records = store.load_all()?;
                let missing = records.iter().filter(|r| r.is_missing_data()).count();
                log::info!("Records: {} ({} missing data)", records.len(), missing);
            } else {
                log::info!("No record table found yet.");
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
