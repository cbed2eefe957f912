//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dapptokens::{PaymentRequest, SolanaNetwork};
use solana_pubkey::Pubkey;

/// Send SPL tokens through the dapptokens program.
#[derive(Debug, Parser)]
#[command(name = "dapptokens", version, about)]
pub struct Cli {
    /// Network to target (`mainnet`, `devnet`, `testnet`, `solana:<genesis>`).
    #[arg(long, global = true)]
    pub network: Option<String>,

    /// JSON-RPC endpoint.
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Keypair file (JSON array of 64 bytes).
    #[arg(long, global = true)]
    pub keypair: Option<PathBuf>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the program address for the network.
    ProgramId,
    /// Validate a payment against current chain state without sending it.
    Check(PaymentArgs),
    /// Validate, sign, send and confirm a payment.
    Transfer(PaymentArgs),
}

/// A payment as given on the command line.
#[derive(Debug, Clone, Args)]
pub struct PaymentArgs {
    /// Recipient wallet.
    #[arg(long)]
    pub to: Pubkey,

    /// Token mint.
    #[arg(long)]
    pub mint: Pubkey,

    /// Amount in the mint's smallest unit.
    #[arg(long)]
    pub amount: u64,

    /// Mint decimals; selects a checked transfer.
    #[arg(long)]
    pub decimals: Option<u8>,

    /// Sending wallet (default: the keypair's address).
    #[arg(long)]
    pub from: Option<Pubkey>,
}

impl PaymentArgs {
    /// Builds the payment request, sending from `default_from` unless
    /// `--from` was given.
    #[must_use]
    pub fn to_request(&self, default_from: Pubkey) -> PaymentRequest {
        let request = PaymentRequest::new(
            self.from.unwrap_or(default_from),
            self.to,
            self.mint,
            self.amount,
        );
        match self.decimals {
            Some(decimals) => request.with_decimals(decimals),
            None => request,
        }
    }
}

impl Cli {
    /// The network named on the command line, if any.
    #[must_use]
    pub fn network(&self) -> Option<SolanaNetwork> {
        self.network.as_deref().map(SolanaNetwork::parse)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_checked_transfer() {
        let to = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let cli = Cli::try_parse_from([
            "dapptokens",
            "transfer",
            "--to",
            &to.to_string(),
            "--mint",
            &mint.to_string(),
            "--amount",
            "1000000",
            "--decimals",
            "6",
            "--network",
            "solana:devnet",
        ])
        .unwrap();

        assert_eq!(cli.network(), Some(SolanaNetwork::Devnet));
        let Command::Transfer(args) = cli.command else {
            panic!("expected transfer");
        };
        let from = Pubkey::new_unique();
        let request = args.to_request(from);
        assert_eq!(request.from_wallet(), from);
        assert_eq!(request.to_wallet(), to);
        assert_eq!(request.amount(), 1_000_000);
        assert_eq!(request.decimals(), Some(6));
    }

    #[test]
    fn test_parse_rejects_bad_pubkey() {
        let result = Cli::try_parse_from([
            "dapptokens",
            "check",
            "--to",
            "not-a-key",
            "--mint",
            "So11111111111111111111111111111111111111112",
            "--amount",
            "1",
        ]);
        assert!(result.is_err());
    }
}
