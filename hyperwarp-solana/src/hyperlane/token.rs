//! Instructions of the Hyperlane Sealevel token programs.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::system_program;

use super::{encode_instruction, pda, InstructionError, H256, SPL_NOOP_PROGRAM_ID, U256};

/// Variant index of `TransferRemote` in the token instruction enum.
pub const TRANSFER_REMOTE_VARIANT: u8 = 1;
/// Variant index of `EnrollRemoteRouter` in the token instruction enum.
pub const ENROLL_REMOTE_ROUTER_VARIANT: u8 = 2;

/// Transfer `amount_or_id` to `recipient` on the `destination_domain`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct TransferRemote {
    /// Domain receiving the tokens
    pub destination_domain: u32,
    /// Receiver on the destination domain
    pub recipient: H256,
    /// Amount in local base units
    pub amount_or_id: U256,
}

/// Router of a remote domain. `None` unenrolls the domain.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct RemoteRouterConfig {
    /// Remote domain
    pub domain: u32,
    /// Warp route on that domain
    pub router: Option<H256>,
}

/// The IGP a warp route pays gas through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgpAccount {
    /// IGP receiving payments directly
    Igp(Pubkey),
    /// Overhead IGP wrapping an inner IGP
    OverheadIgp {
        /// Overhead IGP configured on the route
        overhead: Pubkey,
        /// IGP the overhead IGP pays through
        inner: Pubkey,
    },
}

/// IGP program and account configured on a warp route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgpConfig {
    /// IGP program
    pub program: Pubkey,
    /// IGP account, possibly behind an overhead IGP
    pub account: IgpAccount,
}

/// Accounts of a native token warp route transfer.
#[derive(Debug, Clone, Copy)]
pub struct NativeTransferAccounts {
    /// Warp route program
    pub warp_route: Pubkey,
    /// Mailbox program
    pub mailbox: Pubkey,
    /// Sender paying the tokens and fees
    pub sender: Pubkey,
    /// IGP configured on the route, if any
    pub igp: Option<IgpConfig>,
}

/// A built instruction along with the fresh unique message account that has
/// to co-sign the transaction.
pub struct DispatchBuild {
    /// Instruction to send
    pub instruction: Instruction,
    /// Unique message account, a required signer
    pub unique_message: Keypair,
}

/// Build a `TransferRemote` instruction for a native token warp route.
///
/// Account order:
/// 0. `[executable]` system program
/// 1. `[executable]` SPL noop
/// 2. `[]` token PDA
/// 3. `[executable]` mailbox
/// 4. `[writeable]` mailbox outbox
/// 5. `[]` dispatch authority
/// 6. `[writeable, signer]` sender and mailbox payer
/// 7. `[signer]` unique message account
/// 8. `[writeable]` dispatched message PDA
///
/// followed by the IGP accounts when an IGP is configured, then the native
/// plugin accounts (system program, native collateral PDA).
pub fn transfer_remote_native_instruction(
    accounts: &NativeTransferAccounts,
    xfer: TransferRemote,
) -> Result<DispatchBuild, InstructionError> {
    let unique_message = Keypair::new();
    let unique_key = unique_message.pubkey();

    let (token_key, _) = pda::hyperlane_token(&accounts.warp_route);
    let (dispatch_authority_key, _) = pda::dispatch_authority(&accounts.warp_route);
    let (outbox_key, _) = pda::mailbox_outbox(&accounts.mailbox);
    let (dispatched_message_key, _) = pda::dispatched_message(&accounts.mailbox, &unique_key);
    let (native_collateral_key, _) = pda::native_collateral(&accounts.warp_route);

    let mut metas = vec![
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(SPL_NOOP_PROGRAM_ID, false),
        AccountMeta::new_readonly(token_key, false),
        AccountMeta::new_readonly(accounts.mailbox, false),
        AccountMeta::new(outbox_key, false),
        AccountMeta::new_readonly(dispatch_authority_key, false),
        AccountMeta::new(accounts.sender, true),
        AccountMeta::new_readonly(unique_key, true),
        AccountMeta::new(dispatched_message_key, false),
    ];

    if let Some(igp) = accounts.igp {
        metas.extend(igp_payment_metas(&igp, &unique_key));
    }

    metas.extend([
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new(native_collateral_key, false),
    ]);

    let instruction = Instruction {
        program_id: accounts.warp_route,
        data: encode_instruction(TRANSFER_REMOTE_VARIANT, &xfer)?,
        accounts: metas,
    };

    Ok(DispatchBuild {
        instruction,
        unique_message,
    })
}

fn igp_payment_metas(igp: &IgpConfig, unique_payment: &Pubkey) -> Vec<AccountMeta> {
    let (program_data_key, _) = pda::igp_program_data(&igp.program);
    let (gas_payment_key, _) = pda::igp_gas_payment(&igp.program, unique_payment);

    let mut metas = vec![
        AccountMeta::new_readonly(igp.program, false),
        AccountMeta::new(program_data_key, false),
        AccountMeta::new(gas_payment_key, false),
    ];

    match igp.account {
        IgpAccount::Igp(key) => metas.push(AccountMeta::new(key, false)),
        // the configured overhead IGP, then the inner IGP it pays through
        IgpAccount::OverheadIgp { overhead, inner } => metas.extend([
            AccountMeta::new_readonly(overhead, false),
            AccountMeta::new(inner, false),
        ]),
    }

    metas
}

/// Build an `EnrollRemoteRouter` instruction. Only the warp route owner may send it.
pub fn enroll_remote_router_instruction(
    warp_route: Pubkey,
    owner: Pubkey,
    config: RemoteRouterConfig,
) -> Result<Instruction, InstructionError> {
    let (token_key, _) = pda::hyperlane_token(&warp_route);

    Ok(Instruction {
        program_id: warp_route,
        data: encode_instruction(ENROLL_REMOTE_ROUTER_VARIANT, &config)?,
        accounts: vec![
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new(token_key, false),
            AccountMeta::new(owner, true),
        ],
    })
}
