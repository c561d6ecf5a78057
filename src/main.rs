// src/main.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

use tiny_healthcheck::{
    config::{self, Config},
    liveness, Checker, HealthcheckServer,
};

#[derive(Parser)]
#[command(name = "tiny-healthcheck", about = "Healthcheck aggregator and liveness probe")]
struct Args {
    #[command(subcommand)]
    cmd: Cmds,
}

#[derive(Subcommand)]
enum Cmds {
    /// Serve configured checks over HTTP until interrupted
    Serve {
        /// YAML or JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Query a healthcheck endpoint once; exit 0 when it answers 2xx
    Probe {
        #[arg(default_value = liveness::DEFAULT_URL)]
        url: String,
        #[arg(long, default_value_t = 5.0)]
        timeout_secs: f64,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tiny_healthcheck=info".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    let args = Args::parse();
    match args.cmd {
        Cmds::Serve { config, host, port } => {
            serve(config, host, port).await?;
            Ok(ExitCode::SUCCESS)
        }
        Cmds::Probe { url, timeout_secs } => Ok(probe(&url, timeout_secs).await),
    }
}

async fn serve(config_path: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            config::load_config(&path).await?
        }
        None => Config::default(),
    };
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    let mut checker = Checker::new(config.checker.clone());
    for definition in &config.checks {
        checker
            .add_definition(definition)
            .with_context(|| format!("Failed to register check {:?}", definition.name()))?;
    }
    info!("Registered {} checks", checker.checks().len());

    let server = Arc::new(HealthcheckServer::new(Arc::new(checker), config.server));
    let running = server.start().await?;

    shutdown_signal().await;
    server.stop();
    running.wait().await?;

    Ok(())
}

async fn probe(url: &str, timeout_secs: f64) -> ExitCode {
    let timeout = Duration::try_from_secs_f64(timeout_secs).unwrap_or(liveness::DEFAULT_TIMEOUT);

    match liveness::probe(url, timeout).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
