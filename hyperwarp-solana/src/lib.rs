#![warn(missing_docs)]

//! Solana side of the warp route tooling: Hyperlane instructions, payer
//! keys and transaction submission.

/// Solana config
pub mod config;
/// Hyperlane Sealevel program accounts and instructions.
pub mod hyperlane;
/// Fresh Solana account generation.
pub mod keygen;
/// Keypair loading for the transaction payer.
pub mod payer;
/// Types related to solana.
pub mod types;

/// Atomic instruction batches and transaction composition.
pub mod batch;

/// Transaction submission and confirmation.
pub mod tower;
