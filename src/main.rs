use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use riki_import::config;
use riki_import::importer::Importer;
use riki_import::server;

#[derive(Debug, Parser)]
#[command(author, version, about = "Sync set files and neo standards into the Riki catalog")]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP trigger on `app.listen_addr`
    Serve,
    /// Run both importers once and print the report
    Run,
    /// Run both importers every `app.schedule_interval_secs`, logging the reports
    Schedule,
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(?err, "failed to listen for ctrl-c");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    let importer = Arc::new(Importer::from_config(&cfg)?);

    match args.command {
        Command::Serve => {
            let listener = tokio::net::TcpListener::bind(cfg.app.listen_addr.as_str())
                .await
                .with_context(|| format!("failed to bind {}", cfg.app.listen_addr))?;
            server::serve(listener, importer, shutdown_signal()).await?;
        }
        Command::Run => {
            let report = importer.run().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Schedule => {
            let mut ticker = tokio::time::interval(cfg.app.schedule_interval());
            let shutdown = shutdown_signal();
            tokio::pin!(shutdown);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let report = importer.run().await;
                        info!(report = %serde_json::to_string(&report.neo_import)?, "Neo Standard Import");
                        info!(report = %serde_json::to_string(&report.card_import)?, "Card Import");
                    }
                    _ = &mut shutdown => {
                        info!("shutting down scheduler");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
