use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Transaction message format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageVersion {
    /// Legacy message.
    Legacy,
    /// Version 0 message (address lookup table capable).
    #[default]
    V0,
}

/// Configuration for [`TransactionSubmitter`](super::TransactionSubmitter).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitterConfig {
    /// How long a fetched blockhash is reused, in seconds.
    /// Default: 30
    #[serde(default = "default_blockhash_ttl_secs")]
    pub blockhash_ttl_secs: u64,

    /// Message format of assembled transactions.
    /// Default: v0
    #[serde(default)]
    pub message_version: MessageVersion,
}

const fn default_blockhash_ttl_secs() -> u64 {
    30
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            blockhash_ttl_secs: default_blockhash_ttl_secs(),
            message_version: MessageVersion::default(),
        }
    }
}

impl SubmitterConfig {
    /// Blockhash freshness window.
    #[must_use]
    pub const fn blockhash_ttl(&self) -> Duration {
        Duration::from_secs(self.blockhash_ttl_secs)
    }
}
