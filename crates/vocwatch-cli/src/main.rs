mod collect;
mod notify;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "vocwatch")]
#[command(about = "Community and video brand-mention monitor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect mentions from all sources and merge them into the dataset.
    Collect {
        /// Restrict the run to a single configured search topic.
        #[arg(long)]
        topic: Option<String>,
        /// List what would be collected without touching the network or the
        /// dataset.
        #[arg(long)]
        dry_run: bool,
    },
    /// Send the digest of newly collected mentions to the configured
    /// Slack webhooks.
    Notify,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Arguments first: `--help` and usage errors must not depend on any
    // config file being present.
    let cli = Cli::parse();

    let config = vocwatch_core::load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    match cli.command {
        Commands::Collect { topic, dry_run } => {
            collect::run_collect(&config, topic.as_deref(), dry_run).await
        }
        Commands::Notify => notify::run_notify(&config).await,
    }
}
