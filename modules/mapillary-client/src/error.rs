use thiserror::Error;

pub type Result<T> = std::result::Result<T, MapillaryError>;

#[derive(Debug, Error)]
pub enum MapillaryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-2xx from the Graph API. `body` holds the provider's JSON error
    /// payload when it could be parsed.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: Option<serde_json::Value>,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for MapillaryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MapillaryError::Timeout(err.to_string())
        } else if err.is_decode() {
            MapillaryError::Parse(err.to_string())
        } else {
            MapillaryError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MapillaryError {
    fn from(err: serde_json::Error) -> Self {
        MapillaryError::Parse(err.to_string())
    }
}
