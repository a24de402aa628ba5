use anyhow::Context;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;

use hyperwarp_rollup::{LedgerEvent, RollupClient};
use hyperwarp_solana::batch::AtomicIxBatch;
use hyperwarp_solana::hyperlane::register::register_instruction;
use hyperwarp_solana::hyperlane::token::DispatchBuild;
use hyperwarp_solana::hyperlane::H256;
use hyperwarp_solana::tower::SolanaTower;
use hyperwarp_utils::poll::FixedIntervalPoller;

use crate::config::DeploymentConfig;
use crate::constants::USER_REGISTERED_EVENT;

/// Where registrations are dispatched from and to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterParams {
    /// Program dispatching the registration
    pub register_program: Pubkey,
    /// Mailbox of the Solana chain
    pub mailbox: Pubkey,
    /// Domain of the rollup
    pub destination: u32,
}

impl RegisterParams {
    /// Resolve the accounts from a deployment
    pub fn from_config(config: &DeploymentConfig) -> anyhow::Result<Self> {
        Ok(Self {
            register_program: config.solana.register_program,
            mailbox: config.solana_mailbox()?,
            destination: config.rollup_chain()?.domain_id,
        })
    }

    /// Build the register instruction for `embedded_user`
    pub fn build(&self, payer: &Pubkey, embedded_user: H256) -> anyhow::Result<DispatchBuild> {
        Ok(register_instruction(
            self.register_program,
            self.mailbox,
            *payer,
            self.destination,
            embedded_user,
        )?)
    }
}

/// A registration that reached the rollup
#[derive(Debug, Clone)]
pub struct RegisterOutcome {
    /// Solana transaction that dispatched it
    pub signature: Signature,
    /// Event the rollup emitted
    pub event: LedgerEvent,
}

/// Dispatch a registration from Solana and wait for the rollup to process it.
///
/// Events present before the transaction is sent are ignored, so a previous
/// registration can't satisfy the wait.
#[tracing::instrument(skip_all, fields(payer = %payer.pubkey(), embedded_user = %embedded_user))]
pub async fn register_solana_user(
    tower: &SolanaTower,
    rollup: &RollupClient,
    payer: &Keypair,
    params: &RegisterParams,
    embedded_user: H256,
    poller: &FixedIntervalPoller,
) -> anyhow::Result<RegisterOutcome> {
    let baseline = rollup
        .latest_event_number()
        .await
        .context("Failed to read rollup events")?;

    let DispatchBuild {
        instruction,
        unique_message,
    } = params.build(&payer.pubkey(), embedded_user)?;

    let signature = tower
        .send_and_confirm(
            &AtomicIxBatch::new(vec![instruction]),
            payer,
            &[&unique_message],
            poller,
        )
        .await
        .context("Registration transaction failed")?;
    tracing::info!("Transaction confirmed on Solana with signature: {}", signature);

    let event = rollup
        .wait_for_event(USER_REGISTERED_EVENT, baseline, poller)
        .await
        .context("Rollup did not observe the registration")?;

    Ok(RegisterOutcome { signature, event })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_signs_with_payer() {
        let params = RegisterParams {
            register_program: crate::constants::REGISTER_PROGRAM_ID,
            mailbox: Pubkey::new_unique(),
            destination: 5555,
        };
        let payer = Keypair::new();
        let user = H256::parse("11111111111111111111111111111113").unwrap();

        let build = params.build(&payer.pubkey(), user).unwrap();
        assert_eq!(build.instruction.program_id, params.register_program);
        assert_eq!(build.instruction.accounts[5].pubkey, payer.pubkey());

        let tx = AtomicIxBatch::new(vec![build.instruction]).compose_solana_tx(
            &payer,
            &[&build.unique_message],
            Default::default(),
        );
        assert_eq!(tx.signatures.len(), 2);
        assert!(tx.verify().is_ok());
    }
}
