use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{bail, Context};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;

use hyperwarp_solana::batch::AtomicIxBatch;
use hyperwarp_solana::hyperlane::token::{
    transfer_remote_native_instruction, DispatchBuild, IgpConfig, NativeTransferAccounts,
    TransferRemote,
};
use hyperwarp_solana::hyperlane::{H256, U256};
use hyperwarp_solana::tower::SolanaTower;
use hyperwarp_utils::poll::FixedIntervalPoller;

use crate::config::ChainMetadata;
use crate::warp_core::{TokenStandard, WarpCore, WarpCoreError};

/// A transfer of `amount` base units of the origin token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Chain the tokens leave
    pub origin_chain: String,
    /// Warp route of the origin token
    pub origin_token: String,
    /// Chain the tokens arrive on
    pub destination_chain: String,
    /// Receiver on the destination chain
    pub recipient: H256,
    /// Amount in base units of the origin token
    pub amount: u64,
}

/// Resolve the request through the warp core and build the signed transfer
/// transaction. The sender pays the fees and funds the transfer.
pub fn build_transfer_tx(
    warp_core: &WarpCore,
    chains: &BTreeMap<String, ChainMetadata>,
    sender: &Keypair,
    request: &TransferRequest,
    igp: Option<IgpConfig>,
    blockhash: solana_sdk::hash::Hash,
) -> anyhow::Result<Transaction> {
    let origin = warp_core
        .find_token(&request.origin_chain, &request.origin_token)
        .ok_or_else(|| WarpCoreError::TokenNotFound {
            chain: request.origin_chain.clone(),
            address: request.origin_token.clone(),
        })?;
    tracing::debug!("Origin token: {:?}", origin.config);

    if origin.standard() != TokenStandard::SealevelHypNative {
        bail!(
            "Transfers from {:?} tokens are not supported, expected SealevelHypNative",
            origin.standard()
        );
    }

    let origin_metadata = chain(chains, &request.origin_chain)?;
    if origin_metadata.protocol != origin.standard().protocol() {
        return Err(WarpCoreError::ProtocolMismatch {
            chain: request.origin_chain.clone(),
            address: origin.address().to_string(),
            standard_protocol: origin.standard().protocol(),
            chain_protocol: origin_metadata.protocol,
        }
        .into());
    }

    let destination = warp_core.connection_to(origin, &request.destination_chain)?;
    let destination_domain = chain(chains, destination.chain_name())?.domain_id;

    let accounts = NativeTransferAccounts {
        warp_route: Pubkey::from_str(origin.address())
            .with_context(|| format!("Invalid warp route program {}", origin.address()))?,
        mailbox: origin_metadata
            .mailbox
            .with_context(|| format!("No mailbox configured for {}", request.origin_chain))?,
        sender: sender.pubkey(),
        igp,
    };

    let DispatchBuild {
        instruction,
        unique_message,
    } = transfer_remote_native_instruction(
        &accounts,
        TransferRemote {
            destination_domain,
            recipient: request.recipient,
            amount_or_id: U256::from(request.amount),
        },
    )?;

    Ok(AtomicIxBatch::new(vec![instruction]).compose_solana_tx(
        sender,
        &[&unique_message],
        blockhash,
    ))
}

fn chain<'a>(
    chains: &'a BTreeMap<String, ChainMetadata>,
    name: &str,
) -> anyhow::Result<&'a ChainMetadata> {
    chains
        .get(name)
        .with_context(|| format!("Chain {} is not configured", name))
}

/// Send a warp route transfer from a Solana native token and wait for
/// confirmation. A failed transaction is an error.
#[tracing::instrument(skip_all, fields(
    origin = %request.origin_chain,
    destination = %request.destination_chain,
    amount = request.amount,
))]
pub async fn transfer_remote(
    tower: &SolanaTower,
    warp_core: &WarpCore,
    chains: &BTreeMap<String, ChainMetadata>,
    sender: &Keypair,
    request: &TransferRequest,
    igp: Option<IgpConfig>,
    poller: &FixedIntervalPoller,
) -> anyhow::Result<Signature> {
    let blockhash = tower
        .client()
        .get_latest_blockhash()
        .await
        .context("Failed to fetch latest blockhash")?;

    let tx = build_transfer_tx(warp_core, chains, sender, request, igp, blockhash)?;
    tracing::info!("Processing transfer transaction...");

    let signature = tower
        .send_raw_and_confirm(&tx, poller)
        .await
        .context("Transfer failed")?;
    tracing::info!("Transaction confirmed: {}", signature);

    Ok(signature)
}

#[cfg(test)]
mod tests {
    use hyperwarp_solana::hyperlane::pda;

    use super::*;
    use crate::warp_core::tests::{local_config, SOLANA_TOKEN};
    use crate::warp_core::ProtocolType;

    fn chains() -> BTreeMap<String, ChainMetadata> {
        BTreeMap::from([
            (
                "sealevel".to_string(),
                ChainMetadata {
                    domain_id: 1337,
                    protocol: ProtocolType::Sealevel,
                    rpc_url: "http://localhost:8899".parse().unwrap(),
                    mailbox: Some(Pubkey::new_unique()),
                },
            ),
            (
                "sovereign".to_string(),
                ChainMetadata {
                    domain_id: 5555,
                    protocol: ProtocolType::Sovereign,
                    rpc_url: "http://localhost:12346".parse().unwrap(),
                    mailbox: None,
                },
            ),
        ])
    }

    fn request() -> TransferRequest {
        TransferRequest {
            origin_chain: "sealevel".to_string(),
            origin_token: SOLANA_TOKEN.to_string(),
            destination_chain: "sovereign".to_string(),
            recipient: H256::parse("7bWFTGcxY59KfAc5p7SaBaPieQkcSBXs7xCyRoL7vPtf").unwrap(),
            amount: 1,
        }
    }

    #[test]
    fn test_build_transfer_tx() {
        let core = WarpCore::from_config(local_config()).unwrap();
        let chains = chains();
        let sender = Keypair::new();

        let tx =
            build_transfer_tx(&core, &chains, &sender, &request(), None, Default::default()).unwrap();
        assert!(tx.verify().is_ok());
        assert_eq!(tx.message.account_keys[0], sender.pubkey());

        let ix = &tx.message.instructions[0];
        let warp_route = Pubkey::from_str(SOLANA_TOKEN).unwrap();
        assert_eq!(tx.message.account_keys[ix.program_id_index as usize], warp_route);
        // destination domain follows the discriminator and the variant index
        assert_eq!(&ix.data[9..13], &5555u32.to_le_bytes());
        assert!(tx
            .message
            .account_keys
            .contains(&pda::native_collateral(&warp_route).0));
    }

    #[test]
    fn test_rejects_unknown_origin_token() {
        let core = WarpCore::from_config(local_config()).unwrap();
        let mut request = request();
        request.origin_token = Pubkey::new_unique().to_string();

        let err = build_transfer_tx(&core, &chains(), &Keypair::new(), &request, None, Default::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WarpCoreError>(),
            Some(WarpCoreError::TokenNotFound { .. })
        ));
    }

    #[test]
    fn test_rejects_synthetic_origin() {
        let core = WarpCore::from_config(local_config()).unwrap();
        let request = TransferRequest {
            origin_chain: "sovereign".to_string(),
            origin_token: crate::warp_core::tests::SOVEREIGN_TOKEN.to_string(),
            destination_chain: "sealevel".to_string(),
            recipient: H256::default(),
            amount: 1,
        };

        let err = build_transfer_tx(&core, &chains(), &Keypair::new(), &request, None, Default::default())
            .unwrap_err();
        assert!(err.to_string().contains("SealevelHypNative"));
    }

    #[test]
    fn test_requires_mailbox() {
        let core = WarpCore::from_config(local_config()).unwrap();
        let mut chains = chains();
        chains.get_mut("sealevel").unwrap().mailbox = None;

        let err = build_transfer_tx(&core, &chains, &Keypair::new(), &request(), None, Default::default())
            .unwrap_err();
        assert!(err.to_string().contains("No mailbox"));
    }
}
