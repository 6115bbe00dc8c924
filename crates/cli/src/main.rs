//! ember CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize config & data directories
//! - `chat`    — Start an interactive session
//! - `status`  — Show paths, settings, and stored-memory counts

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "ember",
    about = "ember — a conversational CLI companion with durable memory",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and data directories
    Onboard,

    /// Start an interactive conversation
    Chat {
        /// Assistant profile to use (from [profiles.<name>] in config.toml)
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Show system status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat { profile } => commands::chat::run(profile.as_deref()).await?,
        Commands::Status => commands::status::run().await?,
    }

    Ok(())
}
