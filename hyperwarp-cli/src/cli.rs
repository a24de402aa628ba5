use std::path::PathBuf;

use hyperwarp_sdk::hyperwarp_solana::hyperlane::H256;
use hyperwarp_sdk::hyperwarp_utils::poll::FixedIntervalPoller;

pub const DEFAULT_CONFIG_PATH: &str = "config/local.yaml";

/// User registered by `register-solana` unless one is given
pub const EXAMPLE_EMBEDDED_USER: &str = "11111111111111111111111111111113";

/// Configure and exercise Hyperlane warp routes between Solana and a Sovereign rollup
#[derive(Debug, clap::Parser)]
#[command(name = "hyperwarp", version, about)]
pub struct Cli {
    /// Deployment config file (YAML or JSON)
    #[arg(long, short, env = "HYPERWARP_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(flatten)]
    pub poll: FixedIntervalPoller,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    #[command(flatten)]
    Deployment(DeploymentCommand),
    /// Generate keys
    #[command(subcommand)]
    Keygen(KeygenCommand),
}

/// Commands run against the chains of the deployment config
#[derive(Debug, clap::Subcommand)]
pub enum DeploymentCommand {
    /// Register the warp route on the rollup, then configure the IGP
    Bootstrap,
    /// Register the warp route on the rollup
    CreateRoute,
    /// Set the rollup IGP relayer config
    ConfigureIgp,
    /// Enroll the rollup route on the Solana warp route
    EnrollRouter {
        /// Solana warp route, the first native token of the Solana chain when unset
        #[arg(long)]
        token: Option<String>,
        /// Rollup route id, resolved through the warp core when unset
        #[arg(long)]
        router: Option<H256>,
    },
    /// Register a user through the Solana register program and wait for the rollup
    RegisterSolana {
        /// Solana key of the user to register
        #[arg(long, default_value = EXAMPLE_EMBEDDED_USER)]
        embedded_user: H256,
    },
    /// Transfer native tokens from Solana to the rollup
    Transfer {
        /// Amount in the origin token base unit
        #[arg(long, default_value_t = 1)]
        amount: u64,
        /// Rollup recipient, the rollup signer when unset
        #[arg(long)]
        recipient: Option<H256>,
        /// Origin warp route, the first native token of the origin chain when unset
        #[arg(long)]
        token: Option<String>,
        /// Origin chain name, the configured Solana chain when unset
        #[arg(long)]
        origin: Option<String>,
        /// Destination chain name, the configured rollup chain when unset
        #[arg(long)]
        destination: Option<String>,
    },
    /// Wait until the rollup serves requests
    WaitReady,
}

#[derive(Debug, clap::Subcommand)]
pub enum KeygenCommand {
    /// A Solana account
    Solana,
    /// An EVM validator key with its mnemonic
    Validator,
}
