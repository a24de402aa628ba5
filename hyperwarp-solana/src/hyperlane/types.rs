use std::fmt;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

use hyperwarp_utils::hex::{bytes32_to_hex, hex_to_bytes32};

/// A 32 byte address as used in Hyperlane messages, big endian.
#[derive(
    BorshSerialize, BorshDeserialize, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct H256(pub [u8; 32]);

impl H256 {
    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse either a `0x` prefixed hex string or a base58 encoded 32 byte key.
    ///
    /// Base58 covers both Solana pubkeys and rollup addresses, which share
    /// the ed25519 public key encoding.
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        if value.starts_with("0x") {
            return hex_to_bytes32(value).map(Self);
        }

        let bytes = bs58::decode(value)
            .into_vec()
            .map_err(|e| anyhow::anyhow!("Invalid base58 address {}: {}", value, e))?;

        let bytes: [u8; 32] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            anyhow::anyhow!(
                "Expected a 32 byte address, {} decodes to {} bytes",
                value,
                bytes.len()
            )
        })?;

        Ok(Self(bytes))
    }
}

impl From<Pubkey> for H256 {
    fn from(pubkey: Pubkey) -> Self {
        Self(pubkey.to_bytes())
    }
}

impl From<H256> for Pubkey {
    fn from(value: H256) -> Self {
        Pubkey::new_from_array(value.0)
    }
}

impl From<[u8; 32]> for H256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl FromStr for H256 {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bytes32_to_hex(&self.0))
    }
}

impl serde::Serialize for H256 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for H256 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({})", self)
    }
}

/// 256 bit unsigned integer laid out as four little endian `u64` words,
/// the on-chain encoding of token amounts.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct U256(pub [u64; 4]);

impl U256 {
    /// The value if it fits into a [u64]
    pub fn as_u64(&self) -> Option<u64> {
        match self.0 {
            [low, 0, 0, 0] => Some(low),
            _ => None,
        }
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        Self([value, 0, 0, 0])
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        Self([value as u64, (value >> 64) as u64, 0, 0])
    }
}
