use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use streetguess_common::{Coordinates, GameError, Result};

use crate::locator::{ImageLocator, ImageResult};

/// Resolves images through the StreetGuess backend's
/// `GET /api/getMapillaryImage` endpoint, the way a browser front-end would.
pub struct HttpImageLocator {
    client: reqwest::Client,
    base_url: String,
}

/// Error body emitted by the backend: `{ "error": ..., "code": ... }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: serde_json::Value,
    code: Option<String>,
}

impl HttpImageLocator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GameError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ImageLocator for HttpImageLocator {
    async fn locate(&self, at: Coordinates) -> Result<ImageResult> {
        let url = format!("{}/api/getMapillaryImage", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("lat", at.lat.to_string()), ("lon", at.lon.to_string())])
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let text = resp.text().await.map_err(transport_error)?;
        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| GameError::Internal(e.to_string()));
        }

        Err(error_from_response(status.as_u16(), &text))
    }
}

fn transport_error(err: reqwest::Error) -> GameError {
    if err.is_timeout() {
        GameError::Upstream {
            status: 504,
            message: "Timed out waiting for the image service".to_string(),
            provider_error: None,
        }
    } else {
        GameError::Internal(err.to_string())
    }
}

/// Rebuild the structured error from a non-2xx backend response.
fn error_from_response(status: u16, text: &str) -> GameError {
    let Ok(body) = serde_json::from_str::<ErrorBody>(text) else {
        return GameError::Upstream {
            status,
            message: text.to_string(),
            provider_error: None,
        };
    };

    let message = match &body.error {
        serde_json::Value::String(s) => s.clone(),
        other => other
            .get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .unwrap_or_else(|| other.to_string()),
    };

    match (body.code.as_deref(), status) {
        (Some("CONFIGURATION"), _) => GameError::Configuration(message),
        (Some("VALIDATION"), _) | (None, 400) => GameError::Validation(message),
        (Some("NOT_FOUND"), _) | (None, 404) => GameError::NotFound(message),
        (Some("INTERNAL"), _) => GameError::Internal(message),
        _ => GameError::Upstream {
            status,
            message,
            provider_error: match body.error {
                serde_json::Value::String(_) => None,
                other => Some(other),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coded_errors_round_trip() {
        assert_eq!(
            error_from_response(500, r#"{"error":"token missing","code":"CONFIGURATION"}"#),
            GameError::Configuration("token missing".into())
        );
        assert_eq!(
            error_from_response(404, r#"{"error":"none here","code":"NOT_FOUND"}"#),
            GameError::NotFound("none here".into())
        );
        assert_eq!(
            error_from_response(400, r#"{"error":"bad lat"}"#),
            GameError::Validation("bad lat".into())
        );
    }

    #[test]
    fn upstream_keeps_provider_payload() {
        let err = error_from_response(
            403,
            r#"{"error":{"message":"Forbidden","code":10},"code":"UPSTREAM"}"#,
        );
        match err {
            GameError::Upstream {
                status,
                message,
                provider_error,
            } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Forbidden");
                assert_eq!(provider_error.unwrap()["code"], 10);
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[test]
    fn non_json_error_is_upstream() {
        let err = error_from_response(502, "Bad Gateway");
        assert_eq!(err.status_code(), 502);
    }
}
