//! Program derived addresses of the Hyperlane Sealevel programs.

use solana_sdk::pubkey::Pubkey;

/// Mailbox outbox account, owned by the mailbox program.
pub fn mailbox_outbox(mailbox: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"hyperlane", b"-", b"outbox"], mailbox)
}

/// Storage account of a dispatched message, keyed by the unique message account.
pub fn dispatched_message(mailbox: &Pubkey, unique_message: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            b"hyperlane",
            b"-",
            b"dispatched_message",
            b"-",
            unique_message.as_ref(),
        ],
        mailbox,
    )
}

/// Authority a sender program signs with when dispatching through the mailbox.
pub fn dispatch_authority(sender_program: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[b"hyperlane_dispatcher", b"-", b"dispatch_authority"],
        sender_program,
    )
}

/// Warp route storage account. Shares its seeds with the handle account metas PDA.
pub fn hyperlane_token(warp_route: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            b"hyperlane_message_recipient",
            b"-",
            b"handle",
            b"-",
            b"account_metas",
        ],
        warp_route,
    )
}

/// Account holding the lamports locked by a native warp route.
pub fn native_collateral(warp_route: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"hyperlane_token", b"-", b"native_collateral"], warp_route)
}

/// IGP program data account.
pub fn igp_program_data(igp_program: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"hyperlane_igp", b"-", b"program_data"], igp_program)
}

/// Gas payment account, keyed by the unique message account.
pub fn igp_gas_payment(igp_program: &Pubkey, unique_payment: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            b"hyperlane_igp",
            b"-",
            b"gas_payment",
            b"-",
            unique_payment.as_ref(),
        ],
        igp_program,
    )
}
