use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use kampus_server::server::{serve, shutdown_signal};
use kampus_server::{AppConfig, AppState, build_app, logging};
use tokio_util::sync::CancellationToken;

/// KampusCMS front server
#[derive(Parser)]
#[command(name = "kampus-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,

    /// Enable debug logging (ignored when `RUST_LOG` is set)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    logging::init(&cfg.logging, cli.verbose)?;

    let state = AppState::from_config(&cfg)?;
    let addr = cfg.server.socket_addr()?;
    if cli.check {
        tracing::info!(%addr, "Configuration is valid");
        return Ok(());
    }

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            cancel.cancel();
        }
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve(listener, build_app(&state), cancel, cfg.server.shutdown_timeout()).await
}
