use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use advisor_infrastructure::ConfigService;

mod commands;

#[derive(Parser)]
#[command(name = "advisor")]
#[command(
    about = "Beauty Advisor - browse products, build a selection and chat about routines",
    long_about = None
)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the product catalog JSON (overrides `catalog.path`)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products, optionally filtered
    Products {
        /// Only show this category ("all" shows everything)
        #[arg(long)]
        category: Option<String>,

        /// Case-insensitive match on name, brand or category
        #[arg(long)]
        search: Option<String>,
    },
    /// Start an interactive advisor session
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_service = match cli.config {
        Some(path) => ConfigService::new().with_config_path(path),
        None => ConfigService::new(),
    };
    let config = config_service.load_config()?;

    match cli.command {
        Commands::Products { category, search } => {
            commands::products::list(&config, cli.catalog, category, search.unwrap_or_default())
                .await?
        }
        Commands::Chat => {
            let credentials = config_service.credentials();
            commands::chat::run(&config, &credentials, cli.catalog).await?
        }
    }

    Ok(())
}
