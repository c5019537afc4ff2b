//! pushrelay - web push relay server.
//!
//! This is the main binary entry point. See the `pushrelay` library for the
//! core functionality.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use pushrelay::{constants::DEFAULT_ENV_FILE, Config, VapidKeys};

/// Global allocator configured per M-MIMALLOC-APPS guideline.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

// CLI
#[derive(Parser)]
#[command(name = "pushrelay")]
#[command(version)]
#[command(about = "Stores browser push subscriptions and relays notifications to them")]
struct Cli {
    /// Env-file loaded before reading configuration
    #[arg(long, global = true, default_value = DEFAULT_ENV_FILE)]
    env: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Print a fresh VAPID key pair in env-file form
    GenerateVapid,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = Config::load(&cli.env)?;
            log::info!("pushrelay v{} starting", env!("CARGO_PKG_VERSION"));
            pushrelay::server::run(config).await?;
        }
        Commands::GenerateVapid => {
            let keys = VapidKeys::generate()?;
            println!("VAPIDPublicKey={}", keys.public_key_base64url());
            println!("VAPIDPrivateKey={}", keys.private_key_base64url());
        }
    }

    Ok(())
}
