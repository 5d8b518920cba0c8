//! AutoComply connection monitor.
//!
//! Polls the AutoComply backend health endpoint and shows the connection
//! banners in the terminal.
//!
//! ```text
//!   stdin (s / e / q) ──▶ dismiss / quit
//!                              │
//!   ┌──────────┐   tick   ┌────▼────┐  snapshot  ┌────────┐
//!   │ schedule │────────▶│ monitor │───────────▶│ render │──▶ stdout
//!   └──────────┘          └────┬────┘            └────────┘
//!                              │ GET /health (bounded)
//!                              ▼
//!                         AutoComply API
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use autocomply_monitor::config::{resolve_config, HealthEndpoint};
use autocomply_monitor::health::{HealthMonitor, HttpProbe, MonitorSettings};
use autocomply_monitor::lifecycle::{signals, ConsoleCommand};
use autocomply_monitor::observability::{logging, metrics};
use autocomply_monitor::render::{Banner, StatusIndicator};
use autocomply_monitor::session::{self, SuppressionFlag};

#[derive(Parser)]
#[command(name = "autocomply-monitor")]
#[command(about = "Watch AutoComply backend connectivity", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API base URL (overrides config and AUTOCOMPLY_API_BASE).
    #[arg(long)]
    api_base: Option<String>,

    /// Use the /workflow/health route.
    #[arg(long)]
    workflow: bool,

    /// Directory for file-backed session state.
    #[arg(long)]
    session_dir: Option<PathBuf>,

    /// Session id to join; shares the suppression flag with earlier runs.
    #[arg(long)]
    session: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref(), |config| {
        if let Some(base) = cli.api_base {
            config.api.base_url = base.trim_end_matches('/').to_string();
        }
        if cli.workflow {
            config.health_check.endpoint = HealthEndpoint::Workflow;
        }
        if cli.session_dir.is_some() {
            config.session.store_dir = cli.session_dir;
        }
        if cli.session.is_some() {
            config.session.session_id = cli.session;
        }
    })?;

    logging::init_logging(&config.observability);
    tracing::info!("autocomply-monitor v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = session::open_store(&config.session)?;
    let probe = HttpProbe::new(&config.api, config.health_check.endpoint);
    tracing::info!(url = %probe.url(), "Configuration loaded");

    let monitor = HealthMonitor::new(
        probe,
        SuppressionFlag::new(store),
        MonitorSettings::from(&config.health_check),
    );
    let handle = monitor.start();
    let mut updates = handle.subscribe();

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut shown = Banner::Nothing;

    tokio::pin! {
        let signal = signals::shutdown_signal();
    }

    loop {
        tokio::select! {
            _ = &mut signal => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                let banner = Banner::render(&snapshot, &config.api);
                if banner != shown {
                    if !banner.is_nothing() {
                        println!("{}\n", banner);
                    }
                    shown = banner;
                }
                tracing::debug!(status = %StatusIndicator::from_snapshot(&snapshot), "Snapshot");
            }
            line = stdin.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match ConsoleCommand::parse(&line) {
                    Some(ConsoleCommand::DismissSuccess) => handle.dismiss_success(),
                    Some(ConsoleCommand::DismissError) => handle.dismiss_error(),
                    Some(ConsoleCommand::Status) => {
                        println!("{}", StatusIndicator::from_snapshot(&handle.snapshot()))
                    }
                    Some(ConsoleCommand::Quit) => break,
                    None => {}
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin closed");
                    stdin_open = false;
                }
            },
        }
    }

    handle.stop().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
