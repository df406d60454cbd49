use std::path::PathBuf;

use clap::Parser;
use concession_billing::api::{AppState, create_router};
use concession_billing::config::ConfigLoader;
use tracing::info;

/// Serves the concession billing API.
///
/// Events are emitted through `tracing`; install a subscriber in the
/// deployment to collect them.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding billing.yaml and contracts/
    #[arg(long, env = "PARKS_BILLING_CONFIG", default_value = "./config/parks")]
    config_dir: PathBuf,

    /// Address to bind the HTTP listener to
    #[arg(long, env = "PARKS_BILLING_ADDR", default_value = "0.0.0.0:3000")]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ConfigLoader::load(&cli.config_dir)?;
    info!(
        config_dir = %cli.config_dir.display(),
        authority = %config.metadata().authority,
        contracts = config.config().contracts().len(),
        "Loaded concession contracts"
    );

    let router = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&cli.addr).await?;
    info!(addr = %cli.addr, "Listening");

    axum::serve(listener, router).await?;
    Ok(())
}
