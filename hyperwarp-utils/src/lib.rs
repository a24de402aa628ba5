#![warn(missing_docs)]

//! Shared helpers for config files, hex encoding, polling and tracing.

/// Reading of YAML and JSON configuration files.
pub mod config;
/// Conversion helpers between hex strings and fixed-size byte arrays.
pub mod hex;
/// Global tracing subscriber setup.
pub mod logging;
/// Fixed interval polling with a deadline, used to wait for confirmations.
pub mod poll;
