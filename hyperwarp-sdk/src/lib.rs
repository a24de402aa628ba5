#![warn(missing_docs)]

//! Operator tooling for Hyperlane warp routes between a Solana chain and a Sovereign rollup.

/// Sovereign rollup client.
pub use hyperwarp_rollup;
/// Interface to Solana functionalities
pub use hyperwarp_solana;
/// General utilities for the library.
pub use hyperwarp_utils;

mod config;
/// Values of the local development environment.
pub mod constants;
/// The operations run against the chains.
pub mod ops;
/// Token registry resolving warp route counterparts.
pub mod warp_core;

pub use config::*;
