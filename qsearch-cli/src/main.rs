mod menu;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use menu::Menu;
use qsearch_core::{Config, Credentials, Session};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qsearch")]
#[command(about = "Upload question/answer records to Qdrant and search them in natural language", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("qsearch_core=info".parse()?),
        )
        .init();

    let config = Config::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let workflow = qsearch_core::connect(&config, &credentials)
        .context("Failed to set up the Qdrant and embedding clients")?;

    tracing::debug!(
        collection = %config.session.collection_name,
        model = %config.embedding.model,
        "Starting interactive session"
    );

    let stdin = std::io::stdin();
    let menu = Menu::new(workflow, Session::from(&config.session), stdin.lock(), std::io::stdout());
    menu.run().await?;

    Ok(())
}
