use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use streetguess_common::GameError;
use tracing::error;

/// JSON error response: `{ "error": ..., "code": ... }`.
pub struct ApiError(pub GameError);

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        ApiError(err)
    }
}

fn code(err: &GameError) -> &'static str {
    match err {
        GameError::Configuration(_) => "CONFIGURATION",
        GameError::Validation(_) | GameError::NoGuess => "VALIDATION",
        GameError::Upstream { .. } => "UPSTREAM",
        GameError::NotFound(_) => "NOT_FOUND",
        GameError::InvalidTransition { .. } => "CONFLICT",
        GameError::Internal(_) => "INTERNAL",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);

        let error = match &err {
            GameError::Upstream {
                provider_error: Some(payload),
                ..
            } => payload.clone(),
            GameError::Upstream { message, .. } => serde_json::Value::String(message.clone()),
            GameError::Internal(detail) | GameError::Configuration(detail) => {
                error!(error = %detail, "Image lookup failed");
                serde_json::Value::String(err.user_message())
            }
            other => serde_json::Value::String(other.user_message()),
        };

        (
            status,
            Json(serde_json::json!({ "error": error, "code": code(&err) })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_upstream_status_falls_back_to_bad_gateway() {
        let resp = ApiError(GameError::Upstream {
            status: 1000,
            message: "weird".into(),
            provider_error: None,
        })
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn upstream_status_is_forwarded() {
        let resp = ApiError(GameError::Upstream {
            status: 429,
            message: "slow down".into(),
            provider_error: None,
        })
        .into_response();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn configuration_is_500() {
        let resp = ApiError(GameError::Configuration("no token".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
