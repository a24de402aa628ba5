use std::str::FromStr;
use std::sync::Arc;

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use url::Url;

use crate::types::AsyncAtomicRpcClient;

/// Config to be used for solana rpc client.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SolanaConfig {
    /// The RPC URL of the solana node.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: Url,
    /// The commitment level used for sending and confirming transactions.
    #[serde(default = "default_commitment")]
    pub commitment: CommitmentLevel,
}

fn default_rpc_url() -> Url {
    Url::from_str("http://localhost:8899").expect("static url")
}

fn default_commitment() -> CommitmentLevel {
    CommitmentLevel::Confirmed
}

impl SolanaConfig {
    /// Config for a chain from the deployment file, at the default commitment
    pub fn for_rpc_url(rpc_url: Url) -> Self {
        Self {
            rpc_url,
            ..Default::default()
        }
    }

    /// Commitment the RPC client reads and confirms at
    pub fn commitment_config(&self) -> CommitmentConfig {
        CommitmentConfig {
            commitment: self.commitment,
        }
    }

    /// Into a client shared by the tower and the operations
    pub fn into_atomic_client(self) -> AsyncAtomicRpcClient {
        Arc::new(self.into())
    }
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            commitment: default_commitment(),
        }
    }
}

impl From<SolanaConfig> for RpcClient {
    fn from(val: SolanaConfig) -> Self {
        let commitment = val.commitment_config();
        RpcClient::new_with_commitment(val.rpc_url.to_string(), commitment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_defaults() {
        let config: SolanaConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SolanaConfig::default());
        assert_eq!(config.rpc_url.as_str(), "http://localhost:8899/");
        assert_eq!(config.commitment, CommitmentLevel::Confirmed);
    }

    #[test]
    fn test_serde_override() {
        let config: SolanaConfig = serde_json::from_str(
            r#"{"rpc_url": "http://0.0.0.0:8899", "commitment": "finalized"}"#,
        )
        .unwrap();
        assert_eq!(config.rpc_url.host_str(), Some("0.0.0.0"));
        assert_eq!(config.commitment, CommitmentLevel::Finalized);
    }

    #[test]
    fn test_client_commitment() {
        let config = SolanaConfig::for_rpc_url("http://validator:8899".parse().unwrap());
        let client = config.into_atomic_client();
        assert_eq!(client.commitment(), CommitmentConfig::confirmed());
        assert_eq!(client.url(), "http://validator:8899/");
    }
}
