use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::system_program;

use super::token::DispatchBuild;
use super::{encode_instruction, pda, InstructionError, H256, SPL_NOOP_PROGRAM_ID};

/// Instructions of the Solana registration program
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub enum RegisterInstruction {
    /// Dispatch a registration of `embedded_user` to the `destination` domain
    Register {
        destination: u32,
        embedded_user: H256,
    },
}

impl RegisterInstruction {
    fn variant(&self) -> u8 {
        match self {
            RegisterInstruction::Register { .. } => 0,
        }
    }

    fn encode(&self) -> Result<Vec<u8>, InstructionError> {
        match self {
            RegisterInstruction::Register {
                destination,
                embedded_user,
            } => encode_instruction(self.variant(), &(*destination, *embedded_user)),
        }
    }
}

/// Build the registration instruction. The payer both funds the dispatched
/// message account and is the user being registered.
///
/// Accounts:
/// 0. `[executable]` system program
/// 1. `[executable]` SPL noop
/// 2. `[executable]` mailbox
/// 3. `[writeable]` mailbox outbox
/// 4. `[]` dispatch authority of the register program
/// 5. `[writeable, signer]` payer
/// 6. `[signer]` unique message account
/// 7. `[writeable]` dispatched message PDA
pub fn register_instruction(
    register_program: Pubkey,
    mailbox: Pubkey,
    payer: Pubkey,
    destination: u32,
    embedded_user: H256,
) -> Result<DispatchBuild, InstructionError> {
    let unique_message = Keypair::new();
    let unique_key = unique_message.pubkey();

    let (outbox_key, _) = pda::mailbox_outbox(&mailbox);
    let (dispatch_authority_key, _) = pda::dispatch_authority(&register_program);
    let (dispatched_message_key, _) = pda::dispatched_message(&mailbox, &unique_key);

    let data = RegisterInstruction::Register {
        destination,
        embedded_user,
    }
    .encode()?;

    let instruction = Instruction {
        program_id: register_program,
        data,
        accounts: vec![
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(SPL_NOOP_PROGRAM_ID, false),
            AccountMeta::new_readonly(mailbox, false),
            AccountMeta::new(outbox_key, false),
            AccountMeta::new_readonly(dispatch_authority_key, false),
            AccountMeta::new(payer, true),
            AccountMeta::new_readonly(unique_key, true),
            AccountMeta::new(dispatched_message_key, false),
        ],
    };

    Ok(DispatchBuild {
        instruction,
        unique_message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperlane::PROGRAM_INSTRUCTION_DISCRIMINATOR;

    #[test]
    fn test_register_instruction_layout() {
        let program = Pubkey::new_unique();
        let mailbox = Pubkey::new_unique();
        let payer = Pubkey::new_unique();
        let embedded_user = H256::parse("11111111111111111111111111111113").unwrap();

        let build = register_instruction(program, mailbox, payer, 5555, embedded_user).unwrap();
        let ix = &build.instruction;

        assert_eq!(ix.program_id, program);
        assert_eq!(&ix.data[..8], &PROGRAM_INSTRUCTION_DISCRIMINATOR);
        assert_eq!(ix.data[8], 0);
        assert_eq!(&ix.data[9..13], &5555u32.to_le_bytes());
        assert_eq!(&ix.data[13..], embedded_user.as_bytes());

        assert_eq!(ix.accounts.len(), 8);
        assert_eq!(ix.accounts[3].pubkey, pda::mailbox_outbox(&mailbox).0);
        assert_eq!(ix.accounts[4].pubkey, pda::dispatch_authority(&program).0);
        assert_eq!(ix.accounts[5].pubkey, payer);
        assert!(ix.accounts[5].is_signer && ix.accounts[5].is_writable);
        assert_eq!(ix.accounts[6].pubkey, build.unique_message.pubkey());
        assert_eq!(
            ix.accounts[7].pubkey,
            pda::dispatched_message(&mailbox, &build.unique_message.pubkey()).0
        );
    }

    #[test]
    fn test_fresh_unique_message_per_build() {
        let program = Pubkey::new_unique();
        let mailbox = Pubkey::new_unique();
        let payer = Pubkey::new_unique();

        let a = register_instruction(program, mailbox, payer, 1, H256::default()).unwrap();
        let b = register_instruction(program, mailbox, payer, 1, H256::default()).unwrap();
        assert_ne!(a.unique_message.pubkey(), b.unique_message.pubkey());
    }
}
