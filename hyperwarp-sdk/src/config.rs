use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context};
use serde_with::{serde_as, DisplayFromStr};
use solana_sdk::pubkey::Pubkey;
use url::Url;

use hyperwarp_rollup::call::{
    Admin, DomainDefaultGas, DomainOracleData, ExchangeRateAndGasPrice, Ism, RelayerConfig,
    TokenSource, TransferLimits, WarpRegister,
};
use hyperwarp_rollup::{RollupConfig, RollupSigner};
use hyperwarp_solana::config::SolanaConfig;
use hyperwarp_solana::hyperlane::token::{IgpAccount, IgpConfig};
use hyperwarp_solana::hyperlane::H256;
use hyperwarp_utils::config::ReadableConfig;

use crate::constants;
use crate::warp_core::{ProtocolType, WarpCoreConfig};

/// Everything the operations need to know about a local deployment
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DeploymentConfig {
    /// Chain metadata keyed by chain name
    pub chains: BTreeMap<String, ChainMetadata>,
    /// Solana payer and programs
    pub solana: SolanaDeployment,
    /// Rollup signer and client settings
    pub rollup: RollupDeployment,
    /// Warp route registered on the rollup
    #[serde(default)]
    pub route: RouteSettings,
    /// Rollup IGP relayer settings
    #[serde(default)]
    pub igp: IgpSettings,
    /// Tokens and connections of the warp routes
    #[serde(default)]
    pub warp_core: WarpCoreConfig,
}

/// A chain taking part in the deployment
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChainMetadata {
    /// Hyperlane domain
    pub domain_id: u32,
    /// Protocol the chain runs
    pub protocol: ProtocolType,
    /// RPC endpoint
    pub rpc_url: Url,
    /// Mailbox program (Sealevel) or module address
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub mailbox: Option<Pubkey>,
}

/// Solana side of the deployment
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SolanaDeployment {
    /// Name of the Sealevel chain in `chains`
    #[serde(default = "default_solana_chain")]
    pub chain: String,
    /// Solana CLI keypair file of the payer
    pub keypair_path: PathBuf,
    /// Program dispatching user registrations
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "constants::register_program_id")]
    pub register_program: Pubkey,
    /// IGP the Solana warp route pays through
    #[serde(default)]
    pub igp: Option<SolanaIgp>,
}

fn default_solana_chain() -> String {
    constants::SEALEVEL_CHAIN.to_string()
}

/// Interchain gas paymaster accounts on Solana
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SolanaIgp {
    /// IGP program
    #[serde_as(as = "DisplayFromStr")]
    pub program: Pubkey,
    /// IGP account the payments go to
    #[serde_as(as = "DisplayFromStr")]
    pub igp: Pubkey,
    /// Overhead IGP wrapping `igp`
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub overhead_igp: Option<Pubkey>,
}

impl From<SolanaIgp> for IgpConfig {
    fn from(value: SolanaIgp) -> Self {
        let account = match value.overhead_igp {
            Some(overhead) => IgpAccount::OverheadIgp {
                overhead,
                inner: value.igp,
            },
            None => IgpAccount::Igp(value.igp),
        };

        IgpConfig {
            program: value.program,
            account,
        }
    }
}

/// Rollup side of the deployment
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RollupDeployment {
    /// Name of the rollup chain in `chains`
    #[serde(default = "default_rollup_chain")]
    pub chain: String,
    /// Hex encoded 32 byte ed25519 secret of the transaction signer
    pub signer_key: String,
    /// REST endpoint and fee settings
    #[serde(default)]
    pub client: RollupConfig,
}

fn default_rollup_chain() -> String {
    constants::SOVEREIGN_CHAIN.to_string()
}

impl RollupDeployment {
    /// Decode the configured signing key
    pub fn signer(&self) -> anyhow::Result<RollupSigner> {
        RollupSigner::from_hex(&self.signer_key)
    }
}

/// Parameters of the rollup side warp route registration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RouteSettings {
    /// Route admin, the signer when unset
    #[serde(default)]
    pub admin: Option<Admin>,
    /// Security module verifying inbound messages
    #[serde(default = "default_ism")]
    pub ism: Ism,
    /// Domain of the Solana chain
    #[serde(default = "constants::default_remote_domain")]
    pub remote_domain: u32,
    /// Warp route on the remote domain, also the synthetic token's remote id
    #[serde(default = "constants::solana_warp_route_id")]
    pub remote_router: H256,
    /// Decimals of the synthetic token on the rollup
    #[serde(default = "default_decimals")]
    pub local_decimals: u8,
    /// Decimals of the token on the remote domain
    #[serde(default = "default_decimals")]
    pub remote_decimals: u8,
    /// Rate limits of the route
    #[serde(default)]
    pub limits: TransferLimits,
}

fn default_ism() -> Ism {
    Ism::MessageIdMultisig {
        threshold: 1,
        validators: vec![constants::LOCAL_VALIDATOR.to_string()],
    }
}

fn default_decimals() -> u8 {
    9
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            admin: None,
            ism: default_ism(),
            remote_domain: constants::default_remote_domain(),
            remote_router: constants::solana_warp_route_id(),
            local_decimals: default_decimals(),
            remote_decimals: default_decimals(),
            limits: TransferLimits::default(),
        }
    }
}

impl RouteSettings {
    /// Registration call, owned by `signer_address` unless an admin is set
    pub fn to_call(&self, signer_address: &str) -> WarpRegister {
        let admin = self
            .admin
            .clone()
            .unwrap_or_else(|| Admin::InsecureOwner(signer_address.to_string()));

        WarpRegister::new(
            admin,
            self.ism.clone(),
            TokenSource::Synthetic {
                remote_token_id: self.remote_router,
                local_decimals: self.local_decimals,
                remote_decimals: self.remote_decimals,
            },
            vec![(self.remote_domain, self.remote_router)],
            self.limits,
        )
    }
}

/// Rollup IGP relayer configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IgpSettings {
    /// Receiver of gas payments, the signer when unset
    #[serde(default)]
    pub beneficiary: Option<String>,
    /// Gas used for domains without their own setting
    #[serde(default = "default_gas")]
    pub default_gas: u64,
    /// Per domain gas and oracle settings
    #[serde(default = "default_domains")]
    pub domains: Vec<DomainGasSettings>,
}

/// Gas settings of one destination domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DomainGasSettings {
    /// Destination domain
    pub domain: u32,
    /// Gas charged for a message to `domain`
    #[serde(default = "default_domain_gas")]
    pub default_gas: u64,
    /// Gas price on `domain`
    #[serde(default = "one")]
    pub gas_price: u128,
    /// Exchange rate of the rollup token to the remote gas token
    #[serde(default = "one")]
    pub token_exchange_rate: u128,
}

fn default_gas() -> u64 {
    2000
}

fn default_domain_gas() -> u64 {
    3000
}

fn one() -> u128 {
    1
}

fn default_domains() -> Vec<DomainGasSettings> {
    vec![DomainGasSettings {
        domain: constants::default_remote_domain(),
        default_gas: default_domain_gas(),
        gas_price: 1,
        token_exchange_rate: 1,
    }]
}

impl Default for IgpSettings {
    fn default() -> Self {
        Self {
            beneficiary: None,
            default_gas: default_gas(),
            domains: default_domains(),
        }
    }
}

impl IgpSettings {
    /// Relayer configuration with the signer as default beneficiary
    pub fn to_call(&self, signer_address: &str) -> RelayerConfig {
        RelayerConfig {
            beneficiary: self
                .beneficiary
                .clone()
                .unwrap_or_else(|| signer_address.to_string()),
            default_gas: self.default_gas,
            domain_default_gas: self
                .domains
                .iter()
                .map(|d| DomainDefaultGas {
                    default_gas: d.default_gas,
                    domain: d.domain,
                })
                .collect(),
            domain_oracle_data: self
                .domains
                .iter()
                .map(|d| DomainOracleData {
                    data_value: ExchangeRateAndGasPrice {
                        gas_price: d.gas_price,
                        token_exchange_rate: d.token_exchange_rate,
                    },
                    domain: d.domain,
                })
                .collect(),
        }
    }
}

impl DeploymentConfig {
    /// Read the config and apply environment overrides
    pub async fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::read(path)
            .await
            .with_context(|| format!("Failed to load deployment config {}", path.display()))?;
        config.apply_env_overrides()?;

        Ok(config)
    }

    /// `SOVEREIGN_ROLLUP_URL` replaces the configured rollup url
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        let url = std::env::var(constants::ROLLUP_URL_ENV).ok();
        self.override_rollup_url(url.as_deref())
    }

    fn override_rollup_url(&mut self, url: Option<&str>) -> anyhow::Result<()> {
        if let Some(url) = url {
            self.rollup.client.url = url
                .parse()
                .with_context(|| format!("Invalid {}: {}", constants::ROLLUP_URL_ENV, url))?;
        }

        Ok(())
    }

    /// Metadata of a configured chain
    pub fn chain(&self, name: &str) -> anyhow::Result<&ChainMetadata> {
        self.chains
            .get(name)
            .with_context(|| format!("Chain {} is not configured", name))
    }

    /// Metadata of the Solana chain, which must be a sealevel chain
    pub fn solana_chain(&self) -> anyhow::Result<&ChainMetadata> {
        let chain = self.chain(&self.solana.chain)?;
        if chain.protocol != ProtocolType::Sealevel {
            bail!("Chain {} is not a sealevel chain", self.solana.chain);
        }
        Ok(chain)
    }

    /// Metadata of the rollup chain, which must be a sovereign chain
    pub fn rollup_chain(&self) -> anyhow::Result<&ChainMetadata> {
        let chain = self.chain(&self.rollup.chain)?;
        if chain.protocol != ProtocolType::Sovereign {
            bail!("Chain {} is not a sovereign chain", self.rollup.chain);
        }
        Ok(chain)
    }

    /// Mailbox program of the Solana chain
    pub fn solana_mailbox(&self) -> anyhow::Result<Pubkey> {
        self.solana_chain()?
            .mailbox
            .with_context(|| format!("No mailbox configured for {}", self.solana.chain))
    }

    /// RPC config of the Solana chain
    pub fn solana_config(&self) -> anyhow::Result<SolanaConfig> {
        Ok(SolanaConfig::for_rpc_url(
            self.solana_chain()?.rpc_url.clone(),
        ))
    }
}
