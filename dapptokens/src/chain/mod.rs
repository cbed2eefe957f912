//! Contracts with the outside world: RPC transport, chain-state reads and
//! wallet signing.
//!
//! The payment pipeline never talks to a node or a wallet directly. It goes
//! through three traits, each with a production implementation:
//!
//! - [`PaymentRpc`] - blockhash, send and confirm; [`SolanaRpc`] with the `rpc` feature
//! - [`ChainStateReader`] - token account and mint facts for validation;
//!   also implemented by [`SolanaRpc`]
//! - [`WalletSigner`] - transaction signing; [`KeypairSigner`] wraps any
//!   [`solana_signer::Signer`]

pub mod reader;
pub mod rpc;
pub mod signer;
pub mod types;

pub use reader::*;
pub use rpc::*;
pub use signer::*;
pub use types::*;
