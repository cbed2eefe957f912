#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Client bindings and payment pipeline for the `dapptokens` Solana program.
//!
//! The program exposes two SPL Token transfer entry points, `transfer_tokens`
//! and `transfer_tokens_checked`. This crate turns a user's payment request
//! into one of those instructions and lands it on chain:
//!
//! 1. [`payment::validate`] checks the request against pre-fetched chain state
//!    and yields a [`payment::ValidatedPayment`].
//! 2. [`program::build_transfer_instruction`] encodes the instruction for the
//!    program deployment picked by [`networks::resolve_program_address`].
//! 3. [`submit::TransactionSubmitter`] signs, sends and confirms it, drawing
//!    blockhashes from a shared [`blockhash::BlockhashCache`].
//!
//! [`client::PaymentClient`] wires the steps together.
//!
//! # Architecture
//!
//! - [`networks`] - Network identifiers and program deployments
//! - [`payment`] - Payment requests and the validation rule set
//! - [`program`] - Instruction layouts, events and return data of the program
//! - [`blockhash`] - Coalescing blockhash cache
//! - [`submit`] - Transaction assembly, signing, sending and confirmation
//! - [`chain`] - RPC transport, chain-state reader and wallet signer contracts
//! - [`client`] - End-to-end payment flow
//!
//! # Feature Flags
//!
//! - `rpc` - `solana-client` backed implementations of the chain contracts
//! - `telemetry` - `tracing` instrumentation
//!
//! # Example
//!
//! ```ignore
//! use dapptokens::{PaymentClient, PaymentRequest, SolanaNetwork, TransactionSubmitter};
//! use dapptokens::chain::{KeypairSigner, SolanaRpc};
//!
//! let rpc = std::sync::Arc::new(SolanaRpc::new(rpc_url, Default::default()));
//! let submitter = TransactionSubmitter::new(rpc.clone(), Default::default());
//! let client = PaymentClient::new(SolanaNetwork::Devnet, rpc, submitter);
//!
//! let request = PaymentRequest::new(payer.pubkey(), recipient, mint, 1_000_000).with_decimals(6);
//! let result = client.pay(&request, &KeypairSigner::new(payer)).await?;
//! println!("confirmed {}", result.signature);
//! ```

pub mod blockhash;
pub mod chain;
pub mod client;
pub mod error;
pub mod networks;
pub mod payment;
pub mod program;
pub mod submit;

#[cfg(test)]
pub(crate) mod testing;

pub use client::PaymentClient;
pub use error::{Error, ErrorKind};
pub use networks::{SolanaNetwork, resolve_program_address};
pub use payment::{PaymentRequest, ValidatedPayment, validate};
pub use program::{TransferVariant, build_transfer_instruction};
pub use submit::{SubmissionResult, TransactionSubmitter};
