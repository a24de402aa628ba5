/// Program derived addresses.
pub mod pda;
/// Solana side of the sovereign registration program.
pub mod register;
/// Warp route (token program) instructions.
pub mod token;
/// Hyperlane primitive types with their on-chain encoding.
pub mod types;

use borsh::BorshSerialize;
use solana_sdk::pubkey::Pubkey;

pub use types::{H256, U256};

/// Prefix of every instruction handled by a Hyperlane program's own
/// instruction enum, distinguishing it from message recipient interface calls.
pub const PROGRAM_INSTRUCTION_DISCRIMINATOR: [u8; 8] = [1, 1, 1, 1, 1, 1, 1, 1];

/// SPL noop program, used by the mailbox to log dispatched messages
pub const SPL_NOOP_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("noopb9bkMVfRPU8AsbpTUg8AQkHtKwMYZiFUjNRtMmV");

/// Errors building Hyperlane instructions
#[derive(Debug, thiserror::Error)]
pub enum InstructionError {
    /// Borsh serialization failed
    #[error("Failed to encode instruction data: {0}")]
    Encode(#[from] std::io::Error),
}

/// Encode instruction data as the discriminator, the borsh enum variant index
/// and the borsh encoded payload.
pub fn encode_instruction<T: BorshSerialize>(
    variant: u8,
    payload: &T,
) -> Result<Vec<u8>, InstructionError> {
    let mut data = Vec::with_capacity(PROGRAM_INSTRUCTION_DISCRIMINATOR.len() + 64);
    data.extend_from_slice(&PROGRAM_INSTRUCTION_DISCRIMINATOR);
    data.push(variant);
    payload.serialize(&mut data)?;

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_prefix() {
        let data = encode_instruction(3, &42u32).unwrap();
        assert_eq!(&data[..8], &PROGRAM_INSTRUCTION_DISCRIMINATOR);
        assert_eq!(data[8], 3);
        assert_eq!(&data[9..], &42u32.to_le_bytes());
    }

    #[test]
    fn test_noop_program_id() {
        assert_eq!(
            SPL_NOOP_PROGRAM_ID.to_string(),
            "noopb9bkMVfRPU8AsbpTUg8AQkHtKwMYZiFUjNRtMmV"
        );
    }
}
