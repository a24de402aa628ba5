use ethers::signers::coins_bip39::{English, Mnemonic};
use ethers::signers::{MnemonicBuilder, Signer};
use ethers::utils::to_checksum;

/// A fresh Solana keypair
pub use hyperwarp_solana::keygen::GeneratedSolanaAccount;

const MNEMONIC_WORDS: usize = 12;

/// Generate a random Solana account
pub fn generate_solana_account() -> GeneratedSolanaAccount {
    GeneratedSolanaAccount::generate()
}

/// A fresh EVM key for a Hyperlane validator
#[derive(Debug, Clone, serde::Serialize)]
pub struct GeneratedValidator {
    /// Checksummed address
    pub address: String,
    /// Hex encoded secp256k1 secret
    pub private_key: String,
    /// Uncompressed SEC1 public key
    pub public_key: String,
    /// Phrase the key was derived from
    pub mnemonic: String,
}

/// Generate a random validator key from a new 12 word mnemonic, derived at
/// the default Ethereum path.
pub fn generate_validator() -> anyhow::Result<GeneratedValidator> {
    let mut rng = rand::thread_rng();
    let mnemonic = Mnemonic::<English>::new_with_count(&mut rng, MNEMONIC_WORDS)?;

    validator_from_phrase(&mnemonic.to_phrase())
}

/// Derive a validator key from an existing phrase
pub fn validator_from_phrase(phrase: &str) -> anyhow::Result<GeneratedValidator> {
    let wallet = MnemonicBuilder::<English>::default().phrase(phrase).build()?;
    let signing_key = wallet.signer();

    Ok(GeneratedValidator {
        address: to_checksum(&wallet.address(), None),
        private_key: format!("0x{}", hex::encode(signing_key.to_bytes())),
        public_key: format!(
            "0x{}",
            hex::encode(signing_key.verifying_key().to_encoded_point(false).as_bytes())
        ),
        mnemonic: phrase.to_string(),
    })
}
