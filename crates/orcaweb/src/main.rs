//! orcaweb — the Orca configuration daemon.
//!
//! Serves the dashboard and JSON API in front of a trainer's application
//! configuration store. Every edit is written back to the trainer as a
//! whole application document.
//!
//! # Usage
//!
//! ```text
//! orcaweb serve --config /etc/orca/orcaweb.toml
//! orcaweb serve --listen 127.0.0.1:5000 --trainer-url http://trainer:5001
//! orcaweb list --trainer-url http://trainer:5001
//! ```

mod config;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use orca_state::{ApplicationRepository, ConfigStore, MemoryStore, TrainerClient};

use crate::config::WebConfig;

#[derive(Parser)]
#[command(name = "orcaweb", about = "Orca application configuration daemon")]
struct Cli {
    /// Path to orcaweb.toml.
    #[arg(long, global = true, env = "ORCAWEB_CONFIG")]
    config: Option<PathBuf>,

    /// Trainer base URL (overrides the config file).
    #[arg(long, global = true)]
    trainer_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the dashboard and API.
    Serve {
        /// Address to listen on (overrides the config file).
        #[arg(long)]
        listen: Option<SocketAddr>,

        /// Keep applications in process memory instead of the trainer.
        #[arg(long)]
        memory: bool,
    },
    /// Print the trainer's applications as JSON.
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,orcaweb=debug,orca_state=debug,orca_api=debug,orca_dashboard=debug",
                )
            }),
        )
        .init();

    let cli = Cli::parse();

    let mut config = WebConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.trainer_url {
        config.trainer.url = url;
    }

    match cli.command {
        Command::Serve { listen, memory } => {
            if let Some(listen) = listen {
                config.server.listen = listen;
            }
            if memory {
                info!("using in-memory application store");
                serve(MemoryStore::new(), config.server.listen).await
            } else {
                serve(trainer_client(&config)?, config.server.listen).await
            }
        }
        Command::List => {
            let repo = ApplicationRepository::new(trainer_client(&config)?);
            let applications = repo.list().await?;
            println!("{}", serde_json::to_string_pretty(&applications)?);
            Ok(())
        }
    }
}

fn trainer_client(config: &WebConfig) -> anyhow::Result<TrainerClient> {
    let timeout = config.trainer.timeout()?;
    let client = TrainerClient::new(&config.trainer.url, timeout)?;
    info!(uri = %client.applications_uri(), ?timeout, "trainer client configured");
    Ok(client)
}

async fn serve<S: ConfigStore>(store: S, addr: SocketAddr) -> anyhow::Result<()> {
    let router = orca_api::build_router(store);

    info!(%addr, "orcaweb listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => {
                    error!(error = %e, "failed to install CTRL+C handler");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;

    info!("orcaweb stopped");
    Ok(())
}
