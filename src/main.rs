//! Survey server.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌────────────────────────────────────────────┐
//!                         │               SURVEY SERVER                │
//!     Client Request      │  ┌─────────┐   ┌─────────┐   ┌─────────┐   │
//!     ────────────────────┼─▶│   net   │──▶│ request │──▶│ router  │   │
//!                         │  │listener │   │ decoder │   │         │   │
//!                         │  └─────────┘   └─────────┘   └────┬────┘   │
//!                         │                                   │        │
//!                         │                                   ▼        │
//!                         │                            ┌────────────┐  │
//!                         │                            │  identity  │  │
//!                         │                            │   store +  │  │
//!                         │                            │  machine   │  │
//!                         │                            └─────┬──────┘  │
//!     Client Response     │  ┌──────────┐                    │         │
//!     ◀───────────────────┼──│ response │◀───────────────────┘         │
//!                         │  │ renderer │                              │
//!                         │  └──────────┘                              │
//!                         │  config · observability · lifecycle        │
//!                         └────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use survey_server::config::{load_config, validate_config, ConfigError, SurveyConfig};
use survey_server::lifecycle::{wait_for_signal, Shutdown};
use survey_server::net::Listener;
use survey_server::observability::{logging, metrics};
use survey_server::SurveyServer;

#[derive(Parser)]
#[command(name = "survey-server")]
#[command(about = "Interactive survey over a minimal HTTP server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override observability.log_level.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn resolve_config(&self) -> Result<SurveyConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SurveyConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::init_logging(&config.observability)?;

    tracing::info!("survey-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        public_url = %config.site.public_url,
        max_connections = config.listener.max_connections,
        read_timeout_secs = config.timeouts.read_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = Listener::bind(&config.listener).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = SurveyServer::new(config);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let signal_task = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            wait_for_signal().await;
            shutdown.trigger();
        })
    };

    server_task.await??;
    signal_task.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}
