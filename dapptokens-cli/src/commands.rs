//! Command execution.

use std::sync::Arc;

use dapptokens::chain::{KeypairSigner, SolanaRpc};
use dapptokens::{PaymentClient, TransactionSubmitter, resolve_program_address};
use solana_signer::Signer;

use crate::cli::{Cli, Command, PaymentArgs};
use crate::config::CliConfig;
use crate::error::CliError;

/// Applies command-line overrides on top of the loaded configuration.
#[must_use]
pub fn merge(mut config: CliConfig, cli: &Cli) -> CliConfig {
    if let Some(network) = cli.network() {
        config.network = network;
    }
    if let Some(rpc_url) = &cli.rpc_url {
        config.rpc_url = Some(rpc_url.clone());
    }
    if let Some(keypair) = &cli.keypair {
        config.keypair = Some(keypair.clone());
    }
    config
}

/// Runs `command` and prints its JSON result to stdout.
///
/// # Errors
///
/// Returns [`CliError`] if configuration is incomplete or the payment fails.
pub async fn execute(command: &Command, config: &CliConfig) -> Result<(), CliError> {
    let output = match command {
        Command::ProgramId => program_id(config),
        Command::Check(args) => check(args, config).await?,
        Command::Transfer(args) => transfer(args, config).await?,
    };
    print_json(&output);
    Ok(())
}

fn program_id(config: &CliConfig) -> serde_json::Value {
    let network = config.network;
    serde_json::json!({
        "network": network,
        "caip2": network.caip2(),
        "programId": resolve_program_address(network).to_string(),
    })
}

type RpcPaymentClient = PaymentClient<Arc<SolanaRpc>, Arc<SolanaRpc>>;

fn payment_client(config: &CliConfig) -> Result<RpcPaymentClient, CliError> {
    let rpc_url = config.resolved_rpc_url()?;
    tracing::info!(network = %config.network, rpc_url = %rpc_url, "Connecting");
    let rpc = Arc::new(SolanaRpc::new(rpc_url, config.rpc.clone()));
    let submitter = TransactionSubmitter::new(Arc::clone(&rpc), config.submitter.clone());
    Ok(PaymentClient::new(config.network, rpc, submitter))
}

async fn check(args: &PaymentArgs, config: &CliConfig) -> Result<serde_json::Value, CliError> {
    let from = match (args.from, config.load_keypair()) {
        (Some(from), _) => from,
        (None, Ok(keypair)) => keypair.pubkey(),
        (None, Err(e)) => return Err(e),
    };
    let request = args.to_request(from);
    let client = payment_client(config)?;
    let payment = client.check(&request).await?;
    tracing::info!(
        amount = request.amount(),
        variant = payment.variant().instruction_name(),
        "Payment is valid"
    );
    Ok(serde_json::json!({
        "valid": true,
        "request": request,
        "programId": client.program_id().to_string(),
        "instruction": payment.variant().instruction_name(),
        "sourceTokenAccount": payment.source_token_account().to_string(),
        "destinationTokenAccount": payment.destination_token_account().to_string(),
        "decimals": payment.decimals(),
    }))
}

async fn transfer(args: &PaymentArgs, config: &CliConfig) -> Result<serde_json::Value, CliError> {
    let keypair = config.load_keypair()?;
    let request = args.to_request(keypair.pubkey());
    let client = payment_client(config)?;
    let signer = KeypairSigner::new(keypair);

    let result = client.pay(&request, &signer).await.inspect_err(|e| {
        if let dapptokens::Error::Submission(submission) = e
            && let Some(signature) = submission.signature()
        {
            tracing::warn!(
                %signature,
                "Transaction was sent but not confirmed; check its status before retrying"
            );
        }
    })?;

    Ok(serde_json::json!({
        "signature": result.signature.to_string(),
        "blockhash": result.blockhash.blockhash.to_string(),
        "retried": result.retried,
        "programId": client.program_id().to_string(),
    }))
}

#[allow(clippy::print_stdout)]
fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use dapptokens::SolanaNetwork;
    use dapptokens::networks::TEST_PROGRAM_ID;

    use super::*;

    #[test]
    fn test_cli_flags_override_config() {
        let config = CliConfig::parse(
            r#"
            network = "mainnet"
            rpc_url = "http://file.example"
            "#,
        )
        .unwrap();
        let cli = Cli::try_parse_from([
            "dapptokens",
            "--network",
            "testnet",
            "--keypair",
            "/tmp/k.json",
            "program-id",
        ])
        .unwrap();

        let merged = merge(config, &cli);
        assert_eq!(merged.network, SolanaNetwork::Testnet);
        assert_eq!(merged.rpc_url.as_deref(), Some("http://file.example"));
        assert!(merged.keypair.is_some());
    }

    #[test]
    fn test_program_id_output() {
        let config = CliConfig::parse(r#"network = "devnet""#).unwrap();
        let output = program_id(&config);
        assert_eq!(output["network"], "devnet");
        assert_eq!(output["programId"], TEST_PROGRAM_ID.to_string());
        assert_eq!(output["caip2"], "solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1");
    }

    #[tokio::test]
    async fn test_transfer_requires_keypair() {
        let config = CliConfig::default();
        let cli = Cli::try_parse_from([
            "dapptokens",
            "transfer",
            "--to",
            "So11111111111111111111111111111111111111112",
            "--mint",
            "So11111111111111111111111111111111111111112",
            "--amount",
            "1",
        ])
        .unwrap();
        let err = execute(&cli.command, &config).await.unwrap_err();
        assert!(matches!(err, CliError::MissingKeypair));
    }
}
