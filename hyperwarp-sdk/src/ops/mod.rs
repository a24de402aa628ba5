/// Account and validator key generation.
pub mod keys;
/// Solana user registration on the rollup.
pub mod register;
/// Warp route and IGP setup on the rollup, router enrollment on Solana.
pub mod route;
/// Solana to rollup warp route transfers.
pub mod transfer;
