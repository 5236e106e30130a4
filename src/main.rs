use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bitpulse_reader::config::Config;
use bitpulse_reader::routes::{self, AppState};

#[derive(Parser, Debug)]
#[command(name = "bitpulse-reader")]
#[command(about = "Web reading interface for the BitPulse news aggregator")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "BITPULSE_CONFIG", default_value = "bitpulse.toml")]
    config: PathBuf,

    /// Address to listen on, overriding the configuration file
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bitpulse_reader=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = if cli.config.exists() {
        let config = Config::load(&cli.config)?;
        info!("Loaded configuration from {}", cli.config.display());
        config
    } else {
        info!("No configuration at {}, using defaults", cli.config.display());
        Config::default()
    };
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    info!("Using backend at {}", config.backend_url);

    let listen = config.listen.clone();
    let state = Arc::new(AppState::new(config)?);
    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!("Server starting on http://{}", listen);

    axum::serve(listener, app).await?;

    Ok(())
}
