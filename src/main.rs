//! lane-change: sticky traffic-split server.
//!
//! Routes each client (by address) to one of several configured content
//! lanes and keeps that choice until it expires or is cleared.
//!
//! ```text
//!   GET /            ──▶ resolve client lane ──▶ lane headers + content
//!   GET /change      ──▶ current assignment (404 when none)
//!   POST /change     ──▶ {"lane": "B", "duration": 300}
//!   DELETE /change   ──▶ back to the default lane
//!   GET /config      ──▶ lane catalog (no port)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use lane_change::config::load_config;
use lane_change::lifecycle;
use lane_change::observability::logging;

#[derive(Parser)]
#[command(name = "lane-change")]
#[command(about = "Sticky per-client lane routing for traffic-split experiments", long_about = None)]
struct Cli {
    /// Config file (JSON, or TOML with a .toml extension).
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Override the configured listen port.
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!(
                "Ensure that {} exists and provides \"port\", \"default\", and \"lanes\"",
                cli.config.display()
            );
            return ExitCode::FAILURE;
        }
    };
    if let Some(port) = cli.port {
        config.port = port;
    }

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "lane-change starting"
    );

    match lifecycle::start(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
