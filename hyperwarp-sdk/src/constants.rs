//! Values of the local development environment.

use hyperwarp_solana::hyperlane::H256;
use solana_sdk::pubkey::Pubkey;

/// Overrides the configured rollup url
pub const ROLLUP_URL_ENV: &str = "SOVEREIGN_ROLLUP_URL";

/// Default name of the Solana chain
pub const SEALEVEL_CHAIN: &str = "sealevel";
/// Default name of the rollup chain
pub const SOVEREIGN_CHAIN: &str = "sovereign";

/// Hyperlane domain of the local Solana chain
pub const SOLANA_DOMAIN_ID: u32 = 1337;

/// Native token warp route deployed on the local Solana chain
pub const SOLANA_WARP_ROUTE_ID: [u8; 32] = [
    203, 182, 38, 106, 24, 96, 68, 110, 164, 234, 6, 234, 160, 44, 68, 59, 100, 227, 53, 135, 86,
    251, 46, 40, 226, 71, 108, 87, 179, 82, 26, 199,
];

/// Validator signing checkpoints of the local Solana chain
pub const LOCAL_VALIDATOR: &str = "0x2c25Ab04F9cD2beC3D98921b02AFBE54B792cad0";

/// Solana program dispatching user registrations to the rollup
pub const REGISTER_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("HX6EowhA5XwWj29iTFeqhprg1gUxHgv6RNUu4bRtUgob");

/// Event emitted by the rollup once a Solana registration is processed
pub const USER_REGISTERED_EVENT: &str = "SolanaRegistration/UserRegistered";

/// Remote domain of the rollup warp route
pub fn default_remote_domain() -> u32 {
    SOLANA_DOMAIN_ID
}

/// Solana warp route as a Hyperlane address
pub fn solana_warp_route_id() -> H256 {
    H256(SOLANA_WARP_ROUTE_ID)
}

/// Default register program
pub fn register_program_id() -> Pubkey {
    REGISTER_PROGRAM_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warp_route_id() {
        assert_eq!(
            solana_warp_route_id().to_string(),
            "0xcbb6266a1860446ea4ea06eaa02c443b64e3358756fb2e28e2476c57b3521ac7"
        );
        assert_eq!(
            Pubkey::from(solana_warp_route_id()).to_string(),
            "EiCriDMg39gBE38ocdFVraLSA3xJiAeoKhF89LRjFsAe"
        );
    }
}
