use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ct_publisher::config::{load_config, Overrides};
use ct_publisher::lifecycle;
use ct_publisher::observability::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "ct-publisher")]
#[command(version, about = "Serves CT submission chains per issuer", long_about = None)]
struct Args {
    /// File path to the configuration file for this service
    #[arg(long)]
    config: PathBuf,

    /// Listen address override
    #[arg(long)]
    addr: Option<String>,

    /// Debug (metrics) server address override
    #[arg(long = "debug-addr")]
    debug_addr: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let overrides = Overrides {
        address: args.addr,
        debug_address: args.debug_addr,
    };

    // Logging is configured from the file, so errors before that go to stderr.
    let config = match load_config(&args.config, &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ct-publisher: {}: {}", args.config.display(), e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ct-publisher starting");

    match lifecycle::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "ct-publisher failed");
            ExitCode::FAILURE
        }
    }
}
