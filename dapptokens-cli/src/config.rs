//! CLI configuration.
//!
//! Loads configuration from a TOML file with support for environment variable
//! expansion in string values. Variables use `$VAR` or `${VAR}` syntax.
//!
//! # Example Configuration
//!
//! ```toml
//! network = "devnet"
//! rpc_url = "$SOLANA_RPC_URL"
//! keypair = "${HOME}/.config/solana/id.json"
//!
//! [rpc]
//! commitment = "confirmed"
//! confirmTimeoutSecs = 60
//!
//! [submitter]
//! blockhashTtlSecs = 30
//! messageVersion = "v0"
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to configuration file (default: `dapptokens.toml`)
//! - `NETWORK` - Override the network
//! - `RPC_URL` - Override the RPC endpoint

use std::path::{Path, PathBuf};

use dapptokens::SolanaNetwork;
use dapptokens::chain::RpcConfig;
use dapptokens::submit::SubmitterConfig;
use serde::{Deserialize, Serialize};
use solana_keypair::Keypair;

use crate::error::CliError;

/// Top-level CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Target network (default: `devnet`).
    #[serde(default = "default_network")]
    pub network: SolanaNetwork,

    /// JSON-RPC endpoint. Falls back to the network's public endpoint.
    #[serde(default)]
    pub rpc_url: Option<String>,

    /// Path to a keypair file (JSON array of 64 bytes).
    #[serde(default)]
    pub keypair: Option<PathBuf>,

    /// RPC client settings.
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Submission settings.
    #[serde(default)]
    pub submitter: SubmitterConfig,
}

const fn default_network() -> SolanaNetwork {
    SolanaNetwork::Devnet
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            rpc_url: None,
            keypair: None,
            rpc: RpcConfig::default(),
            submitter: SubmitterConfig::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from the path given by the `CONFIG` environment
    /// variable, falling back to `dapptokens.toml` in the current directory.
    ///
    /// `NETWORK` and `RPC_URL` env vars override the file values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, CliError> {
        let path = std::env::var("CONFIG").unwrap_or_else(|_| "dapptokens.toml".to_owned());
        let mut config = Self::load_from(Path::new(&path))?;

        if let Ok(network) = std::env::var("NETWORK") {
            config.network = SolanaNetwork::parse(&network);
        }
        if let Ok(rpc_url) = std::env::var("RPC_URL")
            && !rpc_url.is_empty()
        {
            config.rpc_url = Some(rpc_url);
        }

        Ok(config)
    }

    /// Loads configuration from a specific file path. A missing file yields
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, CliError> {
        let content = if path.exists() {
            std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
                path: path.to_owned(),
                source,
            })?
        } else {
            String::new()
        };
        Self::parse(&content)
    }

    /// Parses configuration from TOML text after expanding environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn parse(content: &str) -> Result<Self, CliError> {
        let expanded = expand_env_vars(content);
        Ok(toml::from_str(&expanded)?)
    }

    /// The RPC endpoint to use.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingRpcUrl`] if none is configured and the
    /// network has no public endpoint.
    pub fn resolved_rpc_url(&self) -> Result<String, CliError> {
        match &self.rpc_url {
            Some(url) => Ok(url.clone()),
            None => self
                .network
                .default_rpc_url()
                .map(str::to_owned)
                .ok_or(CliError::MissingRpcUrl(self.network)),
        }
    }

    /// Loads the configured keypair.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingKeypair`] if none is configured, or
    /// [`CliError::Keypair`] if the file is unreadable or malformed.
    pub fn load_keypair(&self) -> Result<Keypair, CliError> {
        let path = self.keypair.as_deref().ok_or(CliError::MissingKeypair)?;
        read_keypair(path)
    }
}

/// Reads a keypair stored as a JSON array of 64 bytes.
///
/// # Errors
///
/// Returns [`CliError::Keypair`] if the file is unreadable or malformed.
pub fn read_keypair(path: &Path) -> Result<Keypair, CliError> {
    let invalid = |reason: String| CliError::Keypair {
        path: path.to_owned(),
        reason,
    };
    let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let bytes: Vec<u8> = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
    Keypair::try_from(bytes.as_slice()).map_err(|e| invalid(e.to_string()))
}

/// Expands `$VAR` and `${VAR}` patterns in a string from environment variables.
///
/// Unresolved variables are left as-is.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let braced = chars.next_if_eq(&'{').is_some();
        let mut var_name = String::new();
        let mut closed = false;
        while let Some(&c) = chars.peek() {
            if braced && c == '}' {
                chars.next();
                closed = true;
                break;
            }
            if !braced && !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            var_name.push(c);
            chars.next();
        }

        let value = if var_name.is_empty() || (braced && !closed) {
            None
        } else {
            std::env::var(&var_name).ok()
        };
        match value {
            Some(val) => result.push_str(&val),
            None => {
                result.push('$');
                if braced {
                    result.push('{');
                }
                result.push_str(&var_name);
                if closed {
                    result.push('}');
                }
            }
        }
    }

    result
}
