use std::fmt;

use anyhow::Context;
use hyperwarp_solana::payer::SolanaKeyPayer;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;

/// Ed25519 key signing rollup transactions
pub struct RollupSigner {
    keypair: Keypair,
}

impl RollupSigner {
    /// Build the signer from a 32 byte secret seed
    pub fn from_seed(seed: &[u8]) -> anyhow::Result<Self> {
        let keypair = SolanaKeyPayer::from_seed(seed)
            .context("Invalid rollup signer key")?
            .into_keypair();

        Ok(Self { keypair })
    }

    /// Build the signer from a hex encoded 32 byte secret seed
    pub fn from_hex(seed: &str) -> anyhow::Result<Self> {
        let seed = hex::decode(seed.trim_start_matches("0x"))
            .context("Rollup signer key is not valid hex")?;

        Self::from_seed(&seed)
    }

    /// Rollup address of the signer, base58 of the public key
    pub fn address(&self) -> String {
        self.keypair.pubkey().to_string()
    }

    /// Raw public key bytes
    pub fn public_key(&self) -> [u8; 32] {
        self.keypair.pubkey().to_bytes()
    }

    /// Sign arbitrary bytes
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.keypair.sign_message(message)
    }
}

impl fmt::Debug for RollupSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollupSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
