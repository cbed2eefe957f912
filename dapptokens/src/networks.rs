//! Well-known Solana networks and `dapptokens` program deployments.
//!
//! The program has one canonical production deployment and one pinned test
//! deployment shared by devnet and testnet. [`resolve_program_address`] maps a
//! [`SolanaNetwork`] through [`PROGRAM_DEPLOYMENTS`]; anything not in the table
//! falls back to the production address.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_pubkey::{Pubkey, pubkey};

/// Canonical production deployment of the `dapptokens` program.
pub const PROGRAM_ID: Pubkey = pubkey!("JAVuBXeBZqXNtS73azhBDAoYaaAFfo4gWXoZe2e7Jf8H");

/// Test deployment used on devnet and testnet.
pub const TEST_PROGRAM_ID: Pubkey = pubkey!("6z68wfurCMYkZG51s1Et9BJEd9nJGUusjHXNt4dGbNNF");

/// A Solana cluster the payment pipeline can target.
///
/// The set is closed. Identifiers that do not name one of the public clusters
/// (localnet, custom validators, typos) parse as [`SolanaNetwork::Other`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SolanaNetwork {
    /// Mainnet beta.
    Mainnet,
    /// Public devnet.
    Devnet,
    /// Public testnet.
    Testnet,
    /// Any other or unspecified cluster.
    #[default]
    Other,
}

/// Static metadata for a public Solana cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkInfo {
    /// The network this entry describes.
    pub network: SolanaNetwork,
    /// Short name (e.g., "devnet").
    pub name: &'static str,
    /// CAIP-2 reference: the first 32 characters of the genesis hash.
    pub reference: &'static str,
    /// Public RPC endpoint.
    pub rpc_url: &'static str,
}

/// Well-known Solana networks with their names and CAIP-2 references.
pub static SOLANA_NETWORKS: &[NetworkInfo] = &[
    NetworkInfo {
        network: SolanaNetwork::Mainnet,
        name: "mainnet",
        reference: "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp",
        rpc_url: "https://api.mainnet-beta.solana.com",
    },
    NetworkInfo {
        network: SolanaNetwork::Devnet,
        name: "devnet",
        reference: "EtWTRABZaYq6iMfeYKouRu166VU2xqa1",
        rpc_url: "https://api.devnet.solana.com",
    },
    NetworkInfo {
        network: SolanaNetwork::Testnet,
        name: "testnet",
        reference: "4uhcVJyU9pJkvQyS88uRDiswHXSCkY3z",
        rpc_url: "https://api.testnet.solana.com",
    },
];

/// A program address pinned for one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramDeployment {
    /// The network the deployment lives on.
    pub network: SolanaNetwork,
    /// The program address on that network.
    pub program_id: Pubkey,
}

/// Known deployments of the `dapptokens` program.
///
/// Add a network by adding a row; [`resolve_program_address`] has no
/// per-network branches.
pub static PROGRAM_DEPLOYMENTS: &[ProgramDeployment] = &[
    ProgramDeployment {
        network: SolanaNetwork::Mainnet,
        program_id: PROGRAM_ID,
    },
    ProgramDeployment {
        network: SolanaNetwork::Devnet,
        program_id: TEST_PROGRAM_ID,
    },
    ProgramDeployment {
        network: SolanaNetwork::Testnet,
        program_id: TEST_PROGRAM_ID,
    },
];

/// Returns the program address to target on `network`.
///
/// Total: networks without a deployment row resolve to [`PROGRAM_ID`].
#[must_use]
pub fn resolve_program_address(network: SolanaNetwork) -> Pubkey {
    PROGRAM_DEPLOYMENTS
        .iter()
        .find(|d| d.network == network)
        .map_or(PROGRAM_ID, |d| d.program_id)
}

impl SolanaNetwork {
    /// Parses a network identifier. Never fails.
    ///
    /// Accepts plain names (`devnet`), wallet-standard ids (`solana:devnet`),
    /// dashed names (`solana-devnet`), `mainnet-beta`, and CAIP-2 ids
    /// (`solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1`).
    #[must_use]
    pub fn parse(id: &str) -> Self {
        let id = id.trim();
        let reference = id
            .strip_prefix("solana:")
            .or_else(|| id.strip_prefix("solana-"))
            .unwrap_or(id);
        // Genesis references are base58 and match exactly; names ignore case.
        let name = reference.to_ascii_lowercase();
        let name = name.strip_suffix("-beta").unwrap_or(&name);
        SOLANA_NETWORKS
            .iter()
            .find(|info| info.name == name || info.reference == reference)
            .map_or(Self::Other, |info| info.network)
    }

    /// Returns the static metadata for this network, if it is a public cluster.
    #[must_use]
    pub fn info(self) -> Option<&'static NetworkInfo> {
        SOLANA_NETWORKS.iter().find(|info| info.network == self)
    }

    /// Returns the public RPC endpoint of this network, if it has one.
    #[must_use]
    pub fn default_rpc_url(self) -> Option<&'static str> {
        self.info().map(|info| info.rpc_url)
    }

    /// Returns the CAIP-2 chain id (e.g., `solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1`).
    #[must_use]
    pub fn caip2(self) -> Option<String> {
        self.info().map(|info| format!("solana:{}", info.reference))
    }

    /// Short name of the network.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.info().map_or("other", |info| info.name)
    }
}

impl fmt::Display for SolanaNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolanaNetwork {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for SolanaNetwork {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for SolanaNetwork {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SolanaNetwork> for String {
    fn from(value: SolanaNetwork) -> Self {
        value.name().to_owned()
    }
}
