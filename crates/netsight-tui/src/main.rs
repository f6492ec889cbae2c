//! `netsight`: terminal dashboard for devices seen by a network analyzer.
//!
//! Two screens: a live connection table polled from the analyzer, and a
//! per-device statistics view that charts every metric the server reports,
//! either overall or for a chosen date range.
//!
//! Logs are written to a file (default `/tmp/netsight.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use netsight_config::{Overrides, config_path, load_config_from};
use netsight_core::HttpSource;

use crate::app::App;

/// Terminal dashboard for monitoring devices on an analyzed network.
#[derive(Parser, Debug)]
#[command(name = "netsight", version, about)]
struct Cli {
    /// Analyzer base URL (e.g., http://127.0.0.1:8000)
    #[arg(short = 'u', long, env = "NETSIGHT_URL")]
    url: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Device list refresh interval in milliseconds
    #[arg(short = 'i', long)]
    interval_ms: Option<u64>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Log file path (defaults to /tmp/netsight.log)
    #[arg(long, default_value = "/tmp/netsight.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            devices_interval_ms: self.interval_ms,
            insecure: self.insecure,
        }
    }
}

fn filter_directive(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("netsight={level},netsight_core={level},netsight_api={level},netsight_config={level}")
}

/// Set up file-based tracing. Nothing may go to stdout/stderr while the
/// terminal UI is up. The returned guard flushes the log on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(cli.verbose)));

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("netsight.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tui::install_hooks()?;

    let cli = Cli::parse();
    let _guard = setup_tracing(&cli);

    let path = cli.config.clone().unwrap_or_else(config_path);
    let mut config = load_config_from(&path)?;
    config.apply(&cli.overrides());
    let dashboard = config.to_dashboard_config()?;

    info!(
        url = %dashboard.url,
        config = %path.display(),
        interval = ?dashboard.devices_interval,
        "starting netsight"
    );

    let source = HttpSource::new(&dashboard)?;
    let mut app = App::new(source, dashboard.devices_interval);
    app.run().await?;

    info!("netsight exiting");
    Ok(())
}
