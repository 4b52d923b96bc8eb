use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use riki_import::catalog::{CatalogClient, CatalogService};
use riki_import::config;
use riki_import::http;
use riki_import::model::SetInfo;

#[derive(Parser, Debug)]
#[command(about = "Inspect or seed sets in the Riki catalog")]
struct Args {
    /// Path to YAML config
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every set with its stored content hash
    List,
    /// Create a set record
    Create {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        short_name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = config::load(Some(&args.config))?;
    let client = http::build_client(&cfg.sources.user_agent, cfg.app.request_timeout())?;
    let catalog = CatalogClient::new(client, &cfg.catalog.base_url, cfg.catalog.api_key.clone());

    match args.command {
        Command::List => {
            let sets = catalog.list_sets().await?;
            println!("{} sets:", sets.len());
            for set in sets {
                println!(
                    "  {:<8} sha={:<42} released={:<10} {}",
                    set.id,
                    set.sha.as_deref().unwrap_or("-"),
                    set.release_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".into()),
                    set.name
                );
            }
        }
        Command::Create {
            id,
            name,
            short_name,
        } => {
            let set = SetInfo {
                id,
                name,
                short_name,
                set_type: None,
                release_date: None,
                sha: None,
            };
            let reply = catalog.create_set(&set).await?;
            println!("{} -> {} {}", reply.set_id, reply.status, reply.message);
        }
    }
    Ok(())
}
