use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde_json::json;

use autocomply_monitor::config::{resolve_config, HealthEndpoint};
use autocomply_monitor::health::probe::{poll, HttpProbe};
use autocomply_monitor::observability::logging;
use autocomply_monitor::render::ConnectionHint;

#[derive(Parser)]
#[command(name = "health-probe")]
#[command(about = "Run a single AutoComply backend health check", long_about = None)]
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

    /// Timeout in milliseconds (defaults to the configured poll timeout).
    #[arg(short, long)]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref(), |config| {
        if let Some(base) = cli.api_base {
            config.api.base_url = base.trim_end_matches('/').to_string();
        }
    })?;
    let endpoint = if cli.workflow {
        HealthEndpoint::Workflow
    } else {
        config.health_check.endpoint
    };
    let timeout = cli
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.health_check.timeout());

    logging::init_logging(&config.observability);

    let probe = HttpProbe::new(&config.api, endpoint);
    let outcome = poll(&probe, timeout).await;

    let report = json!({
        "url": probe.url(),
        "healthy": outcome.result.succeeded,
        "observed_at": outcome.result.observed_at.to_rfc3339(),
        "elapsed_ms": outcome.elapsed.as_millis() as u64,
        "failure": outcome.error.as_ref().map(|e| json!({
            "kind": e.kind(),
            "detail": e.to_string(),
        })),
        "hint": (!outcome.result.succeeded).then(|| ConnectionHint::for_base(&config.api.base_url)),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !outcome.result.succeeded {
        std::process::exit(1);
    }
    Ok(())
}
