use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Protocol family of a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolType {
    /// Solana virtual machine chains
    Sealevel,
    /// Sovereign SDK rollups
    Sovereign,
}

impl FromStr for ProtocolType {
    type Err = WarpCoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sealevel" => Ok(ProtocolType::Sealevel),
            "sovereign" => Ok(ProtocolType::Sovereign),
            other => Err(WarpCoreError::UnknownProtocol(other.to_string())),
        }
    }
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolType::Sealevel => f.write_str("sealevel"),
            ProtocolType::Sovereign => f.write_str("sovereign"),
        }
    }
}

/// Kind of warp route contract backing a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStandard {
    /// Solana warp route locking the native token
    SealevelHypNative,
    /// Solana warp route locking an SPL token
    SealevelHypCollateral,
    /// Solana warp route minting a synthetic token
    SealevelHypSynthetic,
    /// Rollup warp route locking the gas token
    SovHypNative,
    /// Rollup warp route locking a bank token
    SovHypCollateral,
    /// Rollup warp route minting a synthetic token
    SovHypSynthetic,
}

impl TokenStandard {
    /// Protocol of the chains this standard is deployed on
    pub fn protocol(&self) -> ProtocolType {
        match self {
            TokenStandard::SealevelHypNative
            | TokenStandard::SealevelHypCollateral
            | TokenStandard::SealevelHypSynthetic => ProtocolType::Sealevel,
            TokenStandard::SovHypNative
            | TokenStandard::SovHypCollateral
            | TokenStandard::SovHypSynthetic => ProtocolType::Sovereign,
        }
    }
}

/// Errors of the warp core registry
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WarpCoreError {
    /// Connection string is not `protocol|chain|address`
    #[error("Invalid token connection {0:?}, expected protocol|chain|address")]
    InvalidConnection(String),

    /// Protocol name other than `sealevel` or `sovereign`
    #[error("Unknown protocol {0:?}")]
    UnknownProtocol(String),

    /// No token with this address on the chain
    #[error("Token {address} not found on chain {chain}")]
    TokenNotFound {
        /// Chain searched
        chain: String,
        /// Address searched for
        address: String,
    },

    /// The token has no counterpart on the destination chain
    #[error("Token {address} on {chain} has no connection to {destination}")]
    NoConnection {
        /// Chain of the token
        chain: String,
        /// Address of the token
        address: String,
        /// Chain without a counterpart
        destination: String,
    },

    /// The token standard belongs to another protocol than its chain
    #[error("Token {address} on {chain} uses protocol {standard_protocol} but the chain is {chain_protocol}")]
    ProtocolMismatch {
        /// Chain of the token
        chain: String,
        /// Address of the token
        address: String,
        /// Protocol of the token standard
        standard_protocol: ProtocolType,
        /// Protocol of the chain
        chain_protocol: ProtocolType,
    },
}

/// `protocol|chain|address` reference from one token to its counterpart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConnection {
    /// Protocol of the counterpart chain
    pub protocol: ProtocolType,
    /// Chain of the counterpart
    pub chain_name: String,
    /// Address of the counterpart
    pub address: String,
}

impl TokenConnection {
    /// Parse a `protocol|chain|address` string
    pub fn parse(value: &str) -> Result<Self, WarpCoreError> {
        let parts: Vec<&str> = value.split('|').collect();
        let [protocol, chain_name, address] = parts.as_slice() else {
            return Err(WarpCoreError::InvalidConnection(value.to_string()));
        };

        if chain_name.is_empty() || address.is_empty() {
            return Err(WarpCoreError::InvalidConnection(value.to_string()));
        }

        Ok(Self {
            protocol: protocol.parse()?,
            chain_name: chain_name.to_string(),
            address: address.to_string(),
        })
    }
}

impl fmt::Display for TokenConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.protocol, self.chain_name, self.address)
    }
}

/// A connection as written in the config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// `protocol|chain|address` of the counterpart token
    pub token: String,
}

/// A token of a warp route as listed in a warp core config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenConfig {
    /// Chain the token lives on
    pub chain_name: String,
    /// Warp route kind
    pub standard: TokenStandard,
    /// Warp route program or module id
    pub address_or_denom: String,
    /// Locked token of a collateral route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collateral_address_or_denom: Option<String>,
    /// Decimals of the token
    pub decimals: u8,
    /// Ticker symbol
    pub symbol: String,
    /// Display name
    pub name: String,
    /// Counterparts on other chains
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
}

/// Tokens of a warp core config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarpCoreConfig {
    /// Configured tokens
    pub tokens: Vec<TokenConfig>,
}

/// A token with parsed connections
#[derive(Debug, Clone)]
pub struct Token {
    /// Token as configured
    pub config: TokenConfig,
    /// Parsed counterparts
    pub connections: Vec<TokenConnection>,
}

impl Token {
    /// Chain the token lives on
    pub fn chain_name(&self) -> &str {
        &self.config.chain_name
    }

    /// Warp route program or module id
    pub fn address(&self) -> &str {
        &self.config.address_or_denom
    }

    /// Warp route kind
    pub fn standard(&self) -> TokenStandard {
        self.config.standard
    }

    fn is(&self, chain: &str, address: &str) -> bool {
        self.config.chain_name == chain && same_address(&self.config.address_or_denom, address)
    }
}

/// Hex addresses compare case-insensitively, base58 ones exactly
fn same_address(a: &str, b: &str) -> bool {
    if a.starts_with("0x") && b.starts_with("0x") {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

/// Registry of the tokens forming warp routes
#[derive(Debug, Clone)]
pub struct WarpCore {
    tokens: Vec<Token>,
}

impl WarpCore {
    /// Build the registry, parsing every connection
    pub fn from_config(config: WarpCoreConfig) -> Result<Self, WarpCoreError> {
        let tokens = config
            .tokens
            .into_iter()
            .map(|config| {
                let connections = config
                    .connections
                    .iter()
                    .map(|c| TokenConnection::parse(&c.token))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Token {
                    config,
                    connections,
                })
            })
            .collect::<Result<Vec<_>, WarpCoreError>>()?;

        Ok(Self { tokens })
    }

    /// All tokens in config order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Token with `address` on `chain`
    pub fn find_token(&self, chain: &str, address: &str) -> Option<&Token> {
        self.tokens.iter().find(|token| token.is(chain, address))
    }

    /// First `SealevelHypNative` token configured on `chain`
    pub fn native_token(&self, chain: &str) -> Option<&Token> {
        self.tokens.iter().find(|token| {
            token.chain_name() == chain && token.standard() == TokenStandard::SealevelHypNative
        })
    }

    /// Resolve the counterpart of `token` on `destination`
    pub fn connection_to(&self, token: &Token, destination: &str) -> Result<&Token, WarpCoreError> {
        let no_connection = || WarpCoreError::NoConnection {
            chain: token.chain_name().to_string(),
            address: token.address().to_string(),
            destination: destination.to_string(),
        };

        let connection = token
            .connections
            .iter()
            .find(|c| c.chain_name == destination)
            .ok_or_else(no_connection)?;

        self.find_token(&connection.chain_name, &connection.address)
            .ok_or_else(|| WarpCoreError::TokenNotFound {
                chain: connection.chain_name.clone(),
                address: connection.address.clone(),
            })
    }
}
