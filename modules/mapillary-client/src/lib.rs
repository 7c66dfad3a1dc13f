pub mod error;
pub mod types;

pub use error::{MapillaryError, Result};
pub use types::{BoundingBox, ImageRecord, ListResponse, PointGeometry, IMAGE_FIELDS};

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://graph.mapillary.com";

pub struct MapillaryClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl MapillaryClient {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(token: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Search `/images` for panoramas inside `bbox`. Ordering is the provider's.
    pub async fn search_panoramas(&self, bbox: &BoundingBox, limit: u32) -> Result<Vec<ImageRecord>> {
        let url = format!("{}/images", self.base_url);
        let fields = IMAGE_FIELDS.join(",");
        let bbox_value = bbox.to_query_value();
        let limit_value = limit.to_string();

        tracing::debug!(bbox = %bbox_value, limit, "Searching Mapillary panoramas");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("access_token", self.token.as_str()),
                ("fields", fields.as_str()),
                ("bbox", bbox_value.as_str()),
                ("is_pano", "true"),
                ("limit", limit_value.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &text));
        }

        let text = resp.text().await?;
        let list: ListResponse<ImageRecord> = serde_json::from_str(&text)?;
        tracing::debug!(count = list.data.len(), "Mapillary search returned");
        Ok(list.data)
    }
}

/// Graph API errors arrive as `{"error": {...}}`; keep the inner object when
/// the body is JSON, otherwise keep the raw text as the message.
fn api_error(status: u16, text: &str) -> MapillaryError {
    let body = serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .map(|v| match v.get("error") {
            Some(inner) => inner.clone(),
            None => v,
        });

    let message = body
        .as_ref()
        .and_then(|b| b.get("message"))
        .and_then(|m| m.as_str())
        .map(String::from)
        .unwrap_or_else(|| text.to_string());

    MapillaryError::Api {
        status,
        message,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_unwraps_graph_error_object() {
        let err = api_error(
            401,
            r#"{"error":{"message":"Invalid OAuth access token","type":"OAuthException","code":190}}"#,
        );
        match err {
            MapillaryError::Api { status, message, body } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid OAuth access token");
                assert_eq!(body.unwrap()["code"], 190);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn api_error_keeps_plain_text_body() {
        match api_error(503, "Service Unavailable") {
            MapillaryError::Api { message, body, .. } => {
                assert_eq!(message, "Service Unavailable");
                assert!(body.is_none());
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client =
            MapillaryClient::new("t".into(), "http://localhost:9/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://localhost:9");
    }
}
