#![warn(missing_docs)]

//! Client for the Sovereign rollup REST API: signing, call messages,
//! transaction submission and ledger events.

/// Runtime call messages.
pub mod call;
/// Rollup REST client.
pub mod client;
/// Rollup endpoint and fee config.
pub mod config;
/// Errors returned by the rollup client.
pub mod error;
/// Transaction signing key.
pub mod signer;
/// Transaction envelope.
pub mod tx;

pub use client::{LedgerEvent, RollupClient, TxReceipt};
pub use config::RollupConfig;
pub use error::{ApiError, RollupError, RollupResult};
pub use signer::RollupSigner;
