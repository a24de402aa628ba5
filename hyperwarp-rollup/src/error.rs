use std::fmt;

use hyperwarp_utils::poll::PollError;

/// Result of rollup client calls
pub type RollupResult<T> = std::result::Result<T, RollupError>;

/// Errors talking to the rollup
#[derive(Debug, thiserror::Error)]
pub enum RollupError {
    /// Transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint could not be built from the configured url
    #[error("invalid rollup url: {0}")]
    Url(#[from] url::ParseError),

    /// Body could not be encoded or decoded
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The rollup answered with an error
    #[error("rollup api error: {0}")]
    Api(ApiError),

    /// A wait gave up
    #[error(transparent)]
    Poll(#[from] PollError),
}

impl RollupError {
    /// The API error, if the rollup rejected the request
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            RollupError::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Error body returned by the rollup REST API
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ApiError {
    /// HTTP status
    pub status: u16,
    /// Short description
    pub message: String,
    /// Module specific details, `null` when absent
    #[serde(default)]
    pub details: serde_json::Value,
}

impl ApiError {
    /// A warp route with the same parameters was already registered by the signer
    pub fn is_already_registered(&self) -> bool {
        self.details
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map_or(false, |message| {
                message.contains("was already registered by sender")
            })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.message)?;
        if !self.details.is_null() {
            write!(f, " ({})", self.details)?;
        }
        Ok(())
    }
}

#[derive(serde::Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ApiError,
}
