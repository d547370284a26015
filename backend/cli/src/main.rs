mod doctor_cmd;
mod status_cmd;

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use captionforge_config::RelayConfig;
use captionforge_gateway::{start_server, GatewayState};
use captionforge_understanding::OpenRouterClient;

#[derive(Parser)]
#[command(name = "captionforge")]
#[command(about = "captionforge — image caption relay for multimodal chat APIs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP relay
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Query a running relay's health endpoint
    Status {
        /// Port the relay listens on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the effective (redacted) configuration and its validation report
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = captionforge_config::load_dotenv();
    let config = RelayConfig::from_env();
    captionforge_logging::init_logger(&config.log_level, config.log_dir.as_deref());
    match dotenv {
        Ok(Some(path)) => debug!(path = %path.display(), "Loaded .env"),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Ignoring unreadable .env file"),
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = RelayConfig {
                port: port.unwrap_or(config.port),
                bind_address: bind.unwrap_or(config.bind_address),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Status { port } => {
            status_cmd::run(port.unwrap_or(config.port)).await?;
        }
        Commands::CheckConfig => {
            if !doctor_cmd::run(&config) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn run_server(config: RelayConfig) -> Result<()> {
    let report = captionforge_config::validate(&config);
    captionforge_config::log_report(&report);
    if !report.is_valid() {
        bail!("Refusing to start with {} config error(s)", report.errors.len());
    }

    info!(
        addr = %config.listen_addr(),
        upstream = %config.upstream_url,
        timeout_secs = config.upstream_timeout_secs,
        max_upload_bytes = config.max_upload_bytes,
        "Starting captionforge relay"
    );

    let client = OpenRouterClient::new(
        config.upstream_url.clone(),
        config.api_key.clone(),
        config.upstream_timeout(),
    )?;
    let state = GatewayState::new(Arc::new(client));

    start_server(&config.listen_addr(), state, config.max_upload_bytes).await
}
