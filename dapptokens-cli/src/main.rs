//! `dapptokens` command-line front end.
//!
//! # Usage
//!
//! ```bash
//! # Print the program address for devnet
//! dapptokens --network devnet program-id
//!
//! # Validate a checked transfer without sending it
//! dapptokens check --to <WALLET> --mint <MINT> --amount 1000000 --decimals 6
//!
//! # Send it
//! dapptokens --keypair ~/.config/solana/id.json transfer --to <WALLET> --mint <MINT> --amount 1000000 --decimals 6
//!
//! # Configure logging level
//! RUST_LOG=debug dapptokens program-id
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to TOML configuration file (default: `dapptokens.toml`)
//! - `NETWORK` - Override the network
//! - `RPC_URL` - Override the RPC endpoint
//! - `RUST_LOG` - Log level filter (default: `info`)

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dapptokens_cli::commands::{execute, merge};
use dapptokens_cli::{Cli, CliConfig};

#[tokio::main]
async fn main() {
    // Initialize tracing with RUST_LOG env filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        tracing::error!("dapptokens failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = merge(CliConfig::load()?, &cli);
    tracing::debug!(
        network = %config.network,
        rpc_url = ?config.rpc_url,
        commitment = ?config.rpc.commitment,
        "Loaded configuration"
    );

    execute(&cli.command, &config).await?;
    Ok(())
}
