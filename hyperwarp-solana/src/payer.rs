use std::ops::Deref;
use std::path::Path;

use solana_sdk::signature::Keypair;
use solana_sdk::signer::keypair::keypair_from_seed;
use tokio::fs::File;

use anyhow::{bail, Context};
use tokio::io::AsyncReadExt;

/// Length of an ed25519 secret seed
pub const SEED_LENGTH: usize = 32;
/// Length of a full keypair (seed followed by public key)
pub const KEYPAIR_LENGTH: usize = 64;

/// A structure that represents the payer in the Solana network
pub struct SolanaKeyPayer {
    /// Signing keypair
    pub payer: Keypair,
}

impl SolanaKeyPayer {
    /// Create a new instance of [SolanaKeyPayer]
    pub fn new(payer: Keypair) -> Self {
        Self { payer }
    }

    /// Read the keypair from a Solana CLI keypair file (JSON array of 64 bytes)
    pub async fn read_from_file(path: &Path) -> anyhow::Result<Self> {
        let mut buf = Vec::new();

        File::open(path)
            .await
            .with_context(|| format!("Failed to open payer keypair file {}", path.display()))?
            .read_to_end(&mut buf)
            .await
            .context("Failed to read payer keypair file")?;

        let json: Vec<u8> = serde_json::from_slice(&buf).context("Failed to parse keypair")?;

        Self::from_bytes(&json)
    }

    /// Build the payer from the 64 byte keypair encoding
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        if bytes.len() != KEYPAIR_LENGTH {
            bail!(
                "Expected a {} byte keypair, got {} bytes",
                KEYPAIR_LENGTH,
                bytes.len()
            );
        }

        let keypair = Keypair::from_bytes(bytes).context("Failed to parse keypair")?;

        Ok(Self::new(keypair))
    }

    /// Build the payer from a 32 byte ed25519 secret seed
    pub fn from_seed(seed: &[u8]) -> anyhow::Result<Self> {
        if seed.len() != SEED_LENGTH {
            bail!(
                "Expected a {} byte secret key, got {} bytes",
                SEED_LENGTH,
                seed.len()
            );
        }

        let keypair = keypair_from_seed(seed)
            .map_err(|e| anyhow::anyhow!("Failed to derive keypair from seed: {}", e))?;

        Ok(Self::new(keypair))
    }

    /// Consumes the instance and returns the keypair
    pub fn into_keypair(self) -> Keypair {
        self.payer
    }
}

impl Deref for SolanaKeyPayer {
    type Target = Keypair;

    fn deref(&self) -> &Self::Target {
        &self.payer
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use solana_sdk::signer::Signer;

    use super::*;

    // local rollup deployer key
    const DEPLOYER_SEED: [u8; 32] = [
        39, 195, 119, 77, 82, 231, 30, 162, 102, 169, 197, 37, 108, 217, 139, 154, 230, 126, 98,
        242, 174, 94, 211, 74, 102, 141, 184, 234, 168, 62, 27, 172,
    ];

    #[test]
    fn test_from_seed_derives_public_key() {
        let payer = SolanaKeyPayer::from_seed(&DEPLOYER_SEED).unwrap();
        assert_eq!(
            payer.pubkey().to_string(),
            "7bWFTGcxY59KfAc5p7SaBaPieQkcSBXs7xCyRoL7vPtf"
        );
    }

    #[test]
    fn test_from_seed_wrong_length() {
        assert!(SolanaKeyPayer::from_seed(&DEPLOYER_SEED[..31]).is_err());
    }

    #[test]
    fn test_from_bytes_wrong_length() {
        let err = SolanaKeyPayer::from_bytes(&[0u8; 32]).err().unwrap();
        assert!(err.to_string().contains("64 byte keypair"));
    }

    #[tokio::test]
    async fn test_read_from_file() {
        let keypair = Keypair::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap().as_bytes())
            .unwrap();

        let payer = SolanaKeyPayer::read_from_file(file.path()).await.unwrap();
        assert_eq!(payer.pubkey(), keypair.pubkey());
    }
}
