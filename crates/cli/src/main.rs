//! Zeal CLI - order operations from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List orders, optionally by shipping status
//! zeal orders list --status pending
//!
//! # Show one order
//! zeal orders show 6650a1b2c3d4e5f6a7b8c9d0
//!
//! # Move an order along the shipping workflow
//! zeal orders ship 6650a1b2c3d4e5f6a7b8c9d0 in_transit
//!
//! # Cancel a pending order
//! zeal orders cancel 6650a1b2c3d4e5f6a7b8c9d0 --reason out_of_stock
//! zeal orders cancel 6650a1b2c3d4e5f6a7b8c9d0 --reason other --note "Khách đặt trùng"
//!
//! # Decide a return request
//! zeal orders return 6650a1b2c3d4e5f6a7b8c9d0 approve
//! ```
//!
//! # Environment Variables
//!
//! - `ZEAL_API_URL` - backend base URL (default `https://api-zeal.onrender.com`)
//! - `ZEAL_TOKEN` - admin bearer token, or
//! - `ZEAL_EMAIL` / `ZEAL_PASSWORD` - admin login

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::orders::OrdersAction;

#[derive(Parser)]
#[command(name = "zeal")]
#[command(author, version, about = "Zeal store operations")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "ZEAL_API_URL", default_value = zeal_api::DEFAULT_BASE_URL, global = true)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "ZEAL_API_TIMEOUT_SECS", default_value_t = 15, global = true)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and update orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zeal=info,zeal_api=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let timeout = std::time::Duration::from_secs(cli.timeout);
    match cli.command {
        Commands::Orders { action } => {
            commands::orders::run(&cli.api_url, timeout, action).await?;
        }
    }
    Ok(())
}
