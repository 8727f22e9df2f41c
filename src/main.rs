// =============================================================================
// market-snapshot - Main Entry Point
// =============================================================================
//
// Binary wrapper around the library: parse arguments, load configuration,
// run the requested mode, and map failures to a non-zero exit code.
// =============================================================================

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use market_snapshot::binance::BinanceClient;
use market_snapshot::config::SnapshotConfig;
use market_snapshot::error::{SnapshotError, SnapshotResult};
use market_snapshot::persist::SnapshotStore;
use market_snapshot::report;
use market_snapshot::snapshot;
use market_snapshot::types::Symbol;

/// Capture a point-in-time market snapshot from Binance public endpoints.
#[derive(Debug, Parser)]
#[command(name = "market-snapshot", version, about)]
struct Args {
    /// Trading pair symbol, e.g. ETHUSDT (case-insensitive).
    symbol: String,

    /// What to run.
    #[arg(value_enum, default_value_t = Mode::Snapshot)]
    mode: Mode,

    /// Override the snapshot output directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to the JSON configuration file.
    #[arg(short, long, default_value = "snapshot_config.json")]
    config: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Full snapshot: fetch, analyse, report, persist.
    Snapshot,
    /// Quick console summary, nothing persisted.
    Info,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Mode::Snapshot => "snapshot",
            Mode::Info => "info",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    // Logs go to stderr so the report on stdout stays clean and pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> SnapshotResult<()> {
    let symbol = Symbol::parse(&args.symbol)?;

    let mut config = match SnapshotConfig::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(
                path = %args.config.display(),
                error = %e,
                "config not loaded, using defaults"
            );
            SnapshotConfig::default()
        }
    };
    config.apply_env_overrides();
    if let Some(dir) = args.output {
        config.snapshot_dir = dir;
    }

    let client = BinanceClient::new(&config)?;

    print!("{}", report::render_header(symbol.as_str(), args.mode.as_str()));

    if !client.ping().await {
        return Err(SnapshotError::Transport(
            "exchange API is unreachable".to_string(),
        ));
    }
    info!(base_url = %config.base_url, "exchange API reachable");

    match args.mode {
        Mode::Snapshot => cmd_snapshot(&client, &symbol, &config).await?,
        Mode::Info => cmd_info(&client, &symbol).await?,
    }

    print!("{}", report::render_footer());
    Ok(())
}

/// Full pipeline: fetch everything, print the report, persist the artifact.
async fn cmd_snapshot(
    client: &BinanceClient,
    symbol: &Symbol,
    config: &SnapshotConfig,
) -> SnapshotResult<()> {
    let snap = snapshot::create_snapshot(client, symbol, config).await?;

    // The report is printed before persisting so a disk failure still
    // leaves the user with the fetched data on screen.
    print!("{}", report::render_snapshot(&snap));

    let store = SnapshotStore::new(&config.snapshot_dir);
    let path = store.save(&snap)?;
    println!("  Snapshot saved: {}\n", path.display());

    Ok(())
}

/// Lightweight mode: two fetches, console only.
async fn cmd_info(client: &BinanceClient, symbol: &Symbol) -> SnapshotResult<()> {
    let (stats, book_ticker) = tokio::try_join!(
        client.get_daily_stats(symbol),
        client.get_book_ticker(symbol),
    )?;

    print!("{}", report::render_info(&stats, &book_ticker));
    Ok(())
}
