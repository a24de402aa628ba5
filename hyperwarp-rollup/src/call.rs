//! Runtime call messages, modelled after the JSON the rollup accepts.

use hyperwarp_solana::hyperlane::H256;
use serde::{Deserialize, Serialize};

/// A call to one of the rollup runtime modules
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeCall {
    /// Warp route module
    Warp(WarpCall),
    /// Interchain gas paymaster module
    InterchainGasPaymaster(IgpCall),
}

impl RuntimeCall {
    /// Short name of the call for logs
    pub fn name(&self) -> &'static str {
        match self {
            RuntimeCall::Warp(WarpCall::Register(_)) => "warp.register",
            RuntimeCall::InterchainGasPaymaster(IgpCall::SetRelayerConfig(_)) => {
                "interchain_gas_paymaster.set_relayer_config"
            }
        }
    }
}

impl From<WarpRegister> for RuntimeCall {
    fn from(value: WarpRegister) -> Self {
        RuntimeCall::Warp(WarpCall::Register(value))
    }
}

impl From<RelayerConfig> for RuntimeCall {
    fn from(value: RelayerConfig) -> Self {
        RuntimeCall::InterchainGasPaymaster(IgpCall::SetRelayerConfig(value))
    }
}

/// Calls of the warp route module
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum WarpCall {
    /// Register a warp route owned by the sender
    Register(WarpRegister),
}

/// Who may change a warp route after registration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum Admin {
    /// Rollup address of the owner
    InsecureOwner(String),
    /// Nobody, the route is immutable
    None,
}

/// Interchain security module verifying inbound messages
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum Ism {
    /// Threshold of validator signatures over the message id
    MessageIdMultisig {
        /// Signatures required
        threshold: u32,
        /// EVM addresses of the validators
        validators: Vec<String>,
    },
    /// Accept whatever a single relayer delivers
    TrustedRelayer {
        /// Rollup address of the relayer
        relayer: String,
    },
    /// Accept every message
    AlwaysTrust,
}

/// What the rollup side of a route holds
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// Mint a synthetic token backed by a remote route
    Synthetic {
        /// Token id on the remote domain
        remote_token_id: H256,
        /// Decimals of the minted token
        local_decimals: u8,
        /// Decimals of the remote token
        remote_decimals: u8,
    },
    /// Lock the rollup gas token
    Native,
}

/// Register a new warp route on the rollup
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WarpRegister {
    /// Route admin
    pub admin: Admin,
    /// Security module of inbound messages
    pub ism: Ism,
    /// Token moved by the route
    pub token_source: TokenSource,
    /// `(domain, router)` pairs
    pub remote_routers: Vec<(u32, H256)>,
    /// Maximum inbound amount
    #[serde(with = "u128_string")]
    pub inbound_transferrable_tokens_limit: u128,
    /// Inbound allowance restored every slot
    #[serde(with = "u128_string")]
    pub inbound_limit_replenishment_per_slot: u128,
    /// Maximum outbound amount
    #[serde(with = "u128_string")]
    pub outbound_transferrable_tokens_limit: u128,
    /// Outbound allowance restored every slot
    #[serde(with = "u128_string")]
    pub outbound_limit_replenishment_per_slot: u128,
}

/// Transfer limits of a warp route, `u128::MAX` meaning unlimited
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferLimits {
    /// Maximum inbound amount
    #[serde(default = "unlimited")]
    pub inbound_transferrable_tokens_limit: u128,
    /// Inbound allowance restored every slot
    #[serde(default = "unlimited")]
    pub inbound_limit_replenishment_per_slot: u128,
    /// Maximum outbound amount
    #[serde(default = "unlimited")]
    pub outbound_transferrable_tokens_limit: u128,
    /// Outbound allowance restored every slot
    #[serde(default = "unlimited")]
    pub outbound_limit_replenishment_per_slot: u128,
}

fn unlimited() -> u128 {
    u128::MAX
}

impl Default for TransferLimits {
    fn default() -> Self {
        Self {
            inbound_transferrable_tokens_limit: u128::MAX,
            inbound_limit_replenishment_per_slot: u128::MAX,
            outbound_transferrable_tokens_limit: u128::MAX,
            outbound_limit_replenishment_per_slot: u128::MAX,
        }
    }
}

impl WarpRegister {
    /// Registration call with the given limits
    pub fn new(
        admin: Admin,
        ism: Ism,
        token_source: TokenSource,
        remote_routers: Vec<(u32, H256)>,
        limits: TransferLimits,
    ) -> Self {
        Self {
            admin,
            ism,
            token_source,
            remote_routers,
            inbound_transferrable_tokens_limit: limits.inbound_transferrable_tokens_limit,
            inbound_limit_replenishment_per_slot: limits.inbound_limit_replenishment_per_slot,
            outbound_transferrable_tokens_limit: limits.outbound_transferrable_tokens_limit,
            outbound_limit_replenishment_per_slot: limits.outbound_limit_replenishment_per_slot,
        }
    }
}

/// Calls of the interchain gas paymaster module
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum IgpCall {
    /// Replace the relayer gas config of the sender
    SetRelayerConfig(RelayerConfig),
}

/// Gas quoting configuration of the relayer paid through the IGP
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelayerConfig {
    /// Rollup address receiving the gas payments
    pub beneficiary: String,
    /// Gas quoted for domains without their own value
    pub default_gas: u64,
    /// Per-domain gas overrides
    pub domain_default_gas: Vec<DomainDefaultGas>,
    /// Per-domain gas oracle values
    pub domain_oracle_data: Vec<DomainOracleData>,
}

/// Gas quoted for messages to one domain
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainDefaultGas {
    /// Gas amount
    pub default_gas: u64,
    /// Destination domain
    pub domain: u32,
}

/// Gas oracle values of one domain
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainOracleData {
    /// Oracle values
    pub data_value: ExchangeRateAndGasPrice,
    /// Destination domain
    pub domain: u32,
}

/// Price inputs of a gas quote
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeRateAndGasPrice {
    /// Gas price on the destination
    pub gas_price: u128,
    /// Destination to local token exchange rate
    pub token_exchange_rate: u128,
}

/// Decimal string encoding of `u128`, which JSON numbers can't carry losslessly
pub mod u128_string {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Write the value as a decimal string
    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    /// Read a decimal string
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ROUTE: &str = "0xcbb6266a1860446ea4ea06eaa02c443b64e3358756fb2e28e2476c57b3521ac7";
    const DEPLOYER: &str = "7bWFTGcxY59KfAc5p7SaBaPieQkcSBXs7xCyRoL7vPtf";

    #[test]
    fn test_warp_register_json() {
        let route = H256::parse(ROUTE).unwrap();
        let call: RuntimeCall = WarpRegister::new(
            Admin::InsecureOwner(DEPLOYER.to_string()),
            Ism::MessageIdMultisig {
                threshold: 1,
                validators: vec!["0x2c25Ab04F9cD2beC3D98921b02AFBE54B792cad0".to_string()],
            },
            TokenSource::Synthetic {
                remote_token_id: route,
                local_decimals: 9,
                remote_decimals: 9,
            },
            vec![(1337, route)],
            TransferLimits::default(),
        )
        .into();

        let max = "340282366920938463463374607431768211455";
        assert_eq!(
            serde_json::to_value(&call).unwrap(),
            json!({
                "warp": {
                    "register": {
                        "admin": { "InsecureOwner": DEPLOYER },
                        "ism": {
                            "MessageIdMultisig": {
                                "threshold": 1,
                                "validators": ["0x2c25Ab04F9cD2beC3D98921b02AFBE54B792cad0"],
                            }
                        },
                        "token_source": {
                            "Synthetic": {
                                "remote_token_id": ROUTE,
                                "local_decimals": 9,
                                "remote_decimals": 9,
                            }
                        },
                        "remote_routers": [[1337, ROUTE]],
                        "inbound_transferrable_tokens_limit": max,
                        "inbound_limit_replenishment_per_slot": max,
                        "outbound_transferrable_tokens_limit": max,
                        "outbound_limit_replenishment_per_slot": max,
                    }
                }
            })
        );
        assert_eq!(call.name(), "warp.register");
    }

    #[test]
    fn test_set_relayer_config_json() {
        let call: RuntimeCall = RelayerConfig {
            beneficiary: DEPLOYER.to_string(),
            default_gas: 2000,
            domain_default_gas: vec![DomainDefaultGas {
                default_gas: 3000,
                domain: 1337,
            }],
            domain_oracle_data: vec![DomainOracleData {
                data_value: ExchangeRateAndGasPrice {
                    gas_price: 1,
                    token_exchange_rate: 1,
                },
                domain: 1337,
            }],
        }
        .into();

        let value = serde_json::to_value(&call).unwrap();
        assert_eq!(
            value,
            json!({
                "interchain_gas_paymaster": {
                    "set_relayer_config": {
                        "beneficiary": DEPLOYER,
                        "default_gas": 2000,
                        "domain_default_gas": [{ "default_gas": 3000, "domain": 1337 }],
                        "domain_oracle_data": [{
                            "data_value": { "gas_price": 1, "token_exchange_rate": 1 },
                            "domain": 1337,
                        }],
                    }
                }
            })
        );
    }

    #[test]
    fn test_unit_variants() {
        assert_eq!(serde_json::to_value(Admin::None).unwrap(), json!("None"));
        assert_eq!(serde_json::to_value(Ism::AlwaysTrust).unwrap(), json!("AlwaysTrust"));
        assert_eq!(serde_json::to_value(TokenSource::Native).unwrap(), json!("Native"));
    }

    #[test]
    fn test_limits_default_to_unlimited() {
        let limits: TransferLimits =
            serde_json::from_value(json!({ "inbound_transferrable_tokens_limit": 10 })).unwrap();
        assert_eq!(limits.inbound_transferrable_tokens_limit, 10);
        assert_eq!(limits.outbound_limit_replenishment_per_slot, u128::MAX);
    }
}
