use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use solana_sdk::pubkey::Pubkey;

use hyperwarp_sdk::hyperwarp_rollup::{RollupClient, RollupSigner};
use hyperwarp_sdk::hyperwarp_solana::hyperlane::H256;
use hyperwarp_sdk::hyperwarp_solana::payer::SolanaKeyPayer;
use hyperwarp_sdk::hyperwarp_solana::tower::SolanaTower;
use hyperwarp_sdk::hyperwarp_utils::logging;
use hyperwarp_sdk::hyperwarp_utils::poll::FixedIntervalPoller;
use hyperwarp_sdk::ops::register::{register_solana_user, RegisterParams};
use hyperwarp_sdk::ops::route::{
    bootstrap, configure_igp, create_warp_route, enroll_solana_router, BootstrapOutcome,
};
use hyperwarp_sdk::ops::transfer::{transfer_remote, TransferRequest};
use hyperwarp_sdk::ops::keys;
use hyperwarp_sdk::warp_core::{Token, WarpCore};
use hyperwarp_sdk::DeploymentConfig;

use crate::cli::{Cli, Command, DeploymentCommand, KeygenCommand};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_from_env(env!("CARGO_PKG_NAME"))?;

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        config,
        poll,
        command,
    } = cli;

    match command {
        Command::Keygen(keygen) => run_keygen(keygen),
        Command::Deployment(command) => {
            let config = DeploymentConfig::load(&config).await?;
            run_deployment(command, &config, &poll).await
        }
    }
}

async fn run_deployment(
    command: DeploymentCommand,
    config: &DeploymentConfig,
    poll: &FixedIntervalPoller,
) -> anyhow::Result<()> {
    match command {
        DeploymentCommand::Bootstrap => {
            let (client, signer) = rollup(config)?;
            match bootstrap(&client, &signer, &config.route, &config.igp).await? {
                BootstrapOutcome::Completed { route, igp } => {
                    println!("Warp route created: {}", pretty(&route)?);
                    println!("IGP configured: {}", pretty(&igp)?);
                }
                BootstrapOutcome::AlreadyRegistered => {
                    println!("Warp route already registered, nothing to do");
                }
            }
        }
        DeploymentCommand::CreateRoute => {
            let (client, signer) = rollup(config)?;
            let receipt = create_warp_route(&client, &signer, &config.route).await?;
            println!("Warp route created: {}", pretty(&receipt)?);
        }
        DeploymentCommand::ConfigureIgp => {
            let (client, signer) = rollup(config)?;
            let receipt = configure_igp(&client, &signer, &config.igp).await?;
            println!("IGP configured: {}", pretty(&receipt)?);
        }
        DeploymentCommand::EnrollRouter { token, router } => {
            enroll(config, token, router, poll).await?;
        }
        DeploymentCommand::RegisterSolana { embedded_user } => {
            register(config, embedded_user, poll).await?;
        }
        DeploymentCommand::Transfer {
            amount,
            recipient,
            token,
            origin,
            destination,
        } => {
            let recipient = match recipient {
                Some(recipient) => recipient,
                None => H256::from(config.rollup.signer()?.public_key()),
            };
            let origin = origin.unwrap_or_else(|| config.solana.chain.clone());
            let destination = destination.unwrap_or_else(|| config.rollup.chain.clone());

            transfer(config, origin, token, destination, recipient, amount, poll).await?;
        }
        DeploymentCommand::WaitReady => {
            let client = RollupClient::new(config.rollup.client.clone());
            client.wait_until_ready(poll).await?;
            println!("Rollup at {} is ready", config.rollup.client.url);
        }
    }

    Ok(())
}

fn run_keygen(command: KeygenCommand) -> anyhow::Result<()> {
    match command {
        KeygenCommand::Solana => {
            let account = keys::generate_solana_account();
            println!("Public Key:           {}", account.public_key);
            println!("Private Key (hex):    {}", account.private_key_hex);
            println!("Private Key (base58): {}", account.private_key_base58);
            println!("Full Secret (64b):    {}", account.keypair_base58);
        }
        KeygenCommand::Validator => {
            let validator = keys::generate_validator()?;
            println!("New Validator Generated\n");
            println!("Address:     {}", validator.address);
            println!("Private Key: {}", validator.private_key);
            println!("Public Key:  {}", validator.public_key);
            println!("Mnemonic:    {}", validator.mnemonic);
        }
    }

    Ok(())
}

fn rollup(config: &DeploymentConfig) -> anyhow::Result<(RollupClient, RollupSigner)> {
    let signer = config.rollup.signer()?;
    tracing::info!("Rollup signer {}", signer.address());

    Ok((RollupClient::new(config.rollup.client.clone()), signer))
}

async fn solana(config: &DeploymentConfig) -> anyhow::Result<(SolanaTower, SolanaKeyPayer)> {
    let client = config.solana_config()?.into_atomic_client();
    let payer = SolanaKeyPayer::read_from_file(&config.solana.keypair_path).await?;

    Ok((SolanaTower::new(client), payer))
}

async fn register(
    config: &DeploymentConfig,
    embedded_user: H256,
    poll: &FixedIntervalPoller,
) -> anyhow::Result<()> {
    let (tower, payer) = solana(config).await?;
    let rollup = RollupClient::new(config.rollup.client.clone());
    let params = RegisterParams::from_config(config)?;

    let outcome =
        register_solana_user(&tower, &rollup, &payer, &params, embedded_user, poll).await?;

    println!(
        "Transaction confirmed on Solana with signature: {}",
        outcome.signature
    );
    println!("{}", pretty(&outcome.event)?);
    println!("Hyperlane registration should now be confirmed on Sovereign.");

    Ok(())
}

async fn transfer(
    config: &DeploymentConfig,
    origin: String,
    token: Option<String>,
    destination: String,
    recipient: H256,
    amount: u64,
    poll: &FixedIntervalPoller,
) -> anyhow::Result<()> {
    let warp_core = WarpCore::from_config(config.warp_core.clone())?;

    let origin_token = match token {
        Some(token) => token,
        None => local_token(&warp_core, &origin, None)?.address().to_string(),
    };

    let (tower, payer) = solana(config).await?;
    let request = TransferRequest {
        origin_chain: origin,
        origin_token,
        destination_chain: destination,
        recipient,
        amount,
    };

    let signature = transfer_remote(
        &tower,
        &warp_core,
        &config.chains,
        &payer,
        &request,
        config.solana.igp.map(Into::into),
        poll,
    )
    .await?;

    println!("Transaction confirmed: {}", signature);
    Ok(())
}

async fn enroll(
    config: &DeploymentConfig,
    token: Option<String>,
    router: Option<H256>,
    poll: &FixedIntervalPoller,
) -> anyhow::Result<()> {
    let warp_core = WarpCore::from_config(config.warp_core.clone())?;
    let local = local_token(&warp_core, &config.solana.chain, token.as_deref())?;

    let router = match router {
        Some(router) => router,
        None => H256::parse(warp_core.connection_to(local, &config.rollup.chain)?.address())?,
    };
    let warp_route = Pubkey::from_str(local.address())
        .with_context(|| format!("Invalid warp route program {}", local.address()))?;
    let domain = config.rollup_chain()?.domain_id;

    let (tower, payer) = solana(config).await?;
    let signature = enroll_solana_router(&tower, &payer, warp_route, domain, router, poll).await?;

    println!("Router {} enrolled for domain {}: {}", router, domain, signature);
    Ok(())
}

/// The given warp route on `chain`, or its first native token
fn local_token<'a>(
    warp_core: &'a WarpCore,
    chain: &str,
    address: Option<&str>,
) -> anyhow::Result<&'a Token> {
    match address {
        Some(address) => warp_core.find_token(chain, address),
        None => warp_core.native_token(chain),
    }
    .with_context(|| format!("No warp route configured on {}", chain))
}

fn pretty<T: serde::Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("Failed to format output")
}
