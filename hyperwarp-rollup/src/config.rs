use std::str::FromStr;

use url::Url;

/// REST API of a rollup started locally
pub const DEFAULT_ROLLUP_URL: &str = "http://localhost:12346";

/// Rollup endpoint and the fee settings applied to every submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RollupConfig {
    /// Rollup REST API url
    #[serde(default = "default_url")]
    pub url: Url,
    /// Chain id the transactions are bound to
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Maximum fee paid for a transaction, in the gas token base unit
    #[serde(default = "default_max_fee")]
    pub max_fee: u128,
    /// Priority fee in basis points
    #[serde(default)]
    pub max_priority_fee_bips: u64,
    /// Optional multi-dimensional gas limit, unlimited when unset
    #[serde(default)]
    pub gas_limit: Option<[u64; 2]>,
}

fn default_url() -> Url {
    Url::from_str(DEFAULT_ROLLUP_URL).expect("static url")
}

fn default_chain_id() -> u64 {
    4321
}

fn default_max_fee() -> u128 {
    100_000_000
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            chain_id: default_chain_id(),
            max_fee: default_max_fee(),
            max_priority_fee_bips: 0,
            gas_limit: None,
        }
    }
}

impl RollupConfig {
    /// Join `path` onto the rollup url
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.url.join(path.trim_start_matches('/'))
    }
}
