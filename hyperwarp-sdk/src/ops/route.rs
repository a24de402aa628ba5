use anyhow::Context;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;

use hyperwarp_rollup::{RollupClient, RollupError, RollupResult, RollupSigner, TxReceipt};
use hyperwarp_solana::batch::AtomicIxBatch;
use hyperwarp_solana::hyperlane::token::{enroll_remote_router_instruction, RemoteRouterConfig};
use hyperwarp_solana::hyperlane::H256;
use hyperwarp_solana::tower::SolanaTower;
use hyperwarp_utils::poll::FixedIntervalPoller;

use crate::config::{IgpSettings, RouteSettings};

/// Register the warp route on the rollup
#[tracing::instrument(skip_all, fields(remote_domain = route.remote_domain))]
pub async fn create_warp_route(
    client: &RollupClient,
    signer: &RollupSigner,
    route: &RouteSettings,
) -> RollupResult<TxReceipt> {
    let call = route.to_call(&signer.address());
    let receipt = client.call(call.into(), signer).await?;
    tracing::info!("Warp route created: {}", receipt.id);

    Ok(receipt)
}

/// Set the relayer gas config of the rollup IGP
#[tracing::instrument(skip_all)]
pub async fn configure_igp(
    client: &RollupClient,
    signer: &RollupSigner,
    igp: &IgpSettings,
) -> RollupResult<TxReceipt> {
    let call = igp.to_call(&signer.address());
    let receipt = client.call(call.into(), signer).await?;
    tracing::info!("IGP configured: {}", receipt.id);

    Ok(receipt)
}

/// Result of a warp route bootstrap
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapOutcome {
    /// The route was registered and its IGP configured
    Completed {
        /// Receipt of the route registration
        route: TxReceipt,
        /// Receipt of the IGP configuration
        igp: TxReceipt,
    },
    /// The signer already registered this route, nothing was changed
    AlreadyRegistered,
}

/// Create the warp route and configure the IGP. A route already registered
/// by the signer ends the bootstrap early without an error.
pub async fn bootstrap(
    client: &RollupClient,
    signer: &RollupSigner,
    route: &RouteSettings,
    igp: &IgpSettings,
) -> RollupResult<BootstrapOutcome> {
    let result = async {
        let route = create_warp_route(client, signer, route).await?;
        let igp = configure_igp(client, signer, igp).await?;
        Ok::<_, RollupError>(BootstrapOutcome::Completed { route, igp })
    };

    match result.await {
        Err(RollupError::Api(err)) if err.is_already_registered() => {
            tracing::info!("Warp route was already registered: {}", err);
            Ok(BootstrapOutcome::AlreadyRegistered)
        }
        other => other,
    }
}

/// Enroll the rollup route as the remote router of the Solana warp route for
/// `domain`. `owner` must own the warp route.
#[tracing::instrument(skip_all, fields(warp_route = %warp_route, domain = domain))]
pub async fn enroll_solana_router(
    tower: &SolanaTower,
    owner: &Keypair,
    warp_route: Pubkey,
    domain: u32,
    router: H256,
    poller: &FixedIntervalPoller,
) -> anyhow::Result<Signature> {
    let ix = enroll_remote_router_instruction(
        warp_route,
        owner.pubkey(),
        RemoteRouterConfig {
            domain,
            router: Some(router),
        },
    )?;

    let signature = tower
        .send_and_confirm(&AtomicIxBatch::new(vec![ix]), owner, &[], poller)
        .await
        .context("Router enrollment failed")?;
    tracing::info!("Enrolled router {} for domain {}: {}", router, domain, signature);

    Ok(signature)
}
