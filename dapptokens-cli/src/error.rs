//! Error types for the command-line front end.

use std::path::PathBuf;

use dapptokens::SolanaNetwork;

/// Errors raised before or around the payment pipeline.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`CliConfig`](crate::CliConfig).
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// No RPC URL was configured and the network has no public default.
    #[error("no rpc_url configured for network {0}")]
    MissingRpcUrl(SolanaNetwork),

    /// The command needs a keypair and none was configured.
    #[error("no keypair configured; set `keypair` in the config or pass --keypair")]
    MissingKeypair,

    /// The keypair file could not be loaded.
    #[error("invalid keypair file {path}: {reason}")]
    Keypair {
        /// Path of the keypair file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// The payment pipeline failed.
    #[error(transparent)]
    Payment(#[from] dapptokens::Error),
}
