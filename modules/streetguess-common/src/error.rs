use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    /// Server misconfigured (e.g. missing provider credential). Retrying won't help.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Provider-side failure. `provider_error` is the provider's own payload when
    /// it could be parsed.
    #[error("Upstream error (status {status}): {message}")]
    Upstream {
        status: u16,
        message: String,
        provider_error: Option<serde_json::Value>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("Place a guess on the map before submitting")]
    NoGuess,

    #[error("{action} is not allowed while {phase}")]
    InvalidTransition { action: &'static str, phase: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GameError {
    /// HTTP status this error is surfaced with.
    pub fn status_code(&self) -> u16 {
        match self {
            GameError::Configuration(_) | GameError::Internal(_) => 500,
            GameError::Validation(_) | GameError::NoGuess => 400,
            GameError::Upstream { status, .. } => *status,
            GameError::NotFound(_) => 404,
            GameError::InvalidTransition { .. } => 409,
        }
    }

    /// Message safe to show a player. Internal details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            GameError::Internal(_) => "Internal server error".to_string(),
            GameError::Configuration(_) => "Server is not configured for image lookups".to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(GameError::Configuration("x".into()).status_code(), 500);
        assert_eq!(GameError::Validation("x".into()).status_code(), 400);
        assert_eq!(GameError::NotFound("x".into()).status_code(), 404);
        assert_eq!(GameError::Internal("x".into()).status_code(), 500);
        assert_eq!(GameError::NoGuess.status_code(), 400);
        let upstream = GameError::Upstream {
            status: 502,
            message: "bad gateway".into(),
            provider_error: None,
        };
        assert_eq!(upstream.status_code(), 502);
    }

    #[test]
    fn internal_details_are_not_surfaced() {
        let err = GameError::Internal("socket closed at 0xdeadbeef".into());
        assert_eq!(err.user_message(), "Internal server error");
    }

    #[test]
    fn only_configuration_is_fatal() {
        assert!(GameError::Configuration("x".into()).is_fatal());
        assert!(!GameError::NotFound("x".into()).is_fatal());
        assert!(!GameError::NoGuess.is_fatal());
    }
}
