use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;

use crate::payer::SEED_LENGTH;

/// A freshly generated Solana account in the encodings operators paste into
/// configs and wallets
#[derive(Debug, Clone, serde::Serialize)]
pub struct GeneratedSolanaAccount {
    /// Base58 public key
    pub public_key: String,
    /// Hex encoded secret seed
    pub private_key_hex: String,
    /// Base58 encoded secret seed
    pub private_key_base58: String,
    /// Secret seed followed by the public key, as used by wallets
    pub keypair_base58: String,
}

impl GeneratedSolanaAccount {
    /// Generate a new random account
    pub fn generate() -> Self {
        Self::from_keypair(&Keypair::new())
    }

    /// Describe an existing keypair
    pub fn from_keypair(keypair: &Keypair) -> Self {
        let bytes = keypair.to_bytes();
        let seed = &bytes[..SEED_LENGTH];

        Self {
            public_key: keypair.pubkey().to_string(),
            private_key_hex: hex::encode(seed),
            private_key_base58: bs58::encode(seed).into_string(),
            keypair_base58: bs58::encode(bytes).into_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payer::SolanaKeyPayer;

    #[test]
    fn test_generated_account_round_trips_through_seed() {
        let account = GeneratedSolanaAccount::generate();

        let seed = hex::decode(&account.private_key_hex).unwrap();
        assert_eq!(seed.len(), SEED_LENGTH);

        let payer = SolanaKeyPayer::from_seed(&seed).unwrap();
        assert_eq!(payer.pubkey().to_string(), account.public_key);

        let full = bs58::decode(&account.keypair_base58).into_vec().unwrap();
        assert_eq!(&full[..SEED_LENGTH], seed.as_slice());
        assert_eq!(&full[SEED_LENGTH..], payer.pubkey().as_ref());
    }

    #[test]
    fn test_base58_and_hex_agree() {
        let account = GeneratedSolanaAccount::generate();
        let from_b58 = bs58::decode(&account.private_key_base58).into_vec().unwrap();
        assert_eq!(hex::encode(from_b58), account.private_key_hex);
    }
}
