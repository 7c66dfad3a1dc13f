use std::sync::Arc;

use async_trait::async_trait;
use mapillary_client::{BoundingBox, ImageRecord, MapillaryClient, MapillaryError};
use serde::{Deserialize, Serialize};
use streetguess_common::{Config, Coordinates, GameError, ProviderPoint, Result};
use tracing::{info, warn};

/// Half-width of the search box in degrees (~1.1 km at the equator).
pub const SEARCH_HALF_WIDTH_DEG: f64 = 0.01;

const NO_PANORAMA: &str = "No panoramic image found in this area";
const GENERIC_UPSTREAM: &str = "Failed to fetch image from Mapillary";

/// The image a round is played on, as handed to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub image_id: String,
    pub image_url: Option<String>,
    /// Provider order, `[lon, lat]`.
    pub coordinates: ProviderPoint,
    pub compass_angle: Option<f64>,
}

impl ImageResult {
    /// Where the image was actually taken, in (lat, lon) order.
    pub fn true_location(&self) -> Coordinates {
        Coordinates::from(self.coordinates)
    }

    fn from_record(record: ImageRecord) -> Result<Self> {
        let image_url = record.best_url().map(String::from);
        let geometry = record.computed_geometry.ok_or_else(|| {
            GameError::Internal(format!("image {} has no computed geometry", record.id))
        })?;
        Ok(Self {
            image_id: record.id,
            image_url,
            coordinates: ProviderPoint(geometry.coordinates),
            compass_angle: record.compass_angle,
        })
    }
}

/// Resolves a location to one panoramic image near it.
#[async_trait]
pub trait ImageLocator: Send + Sync {
    async fn locate(&self, at: Coordinates) -> Result<ImageResult>;
}

#[async_trait]
impl<L: ImageLocator + ?Sized> ImageLocator for Arc<L> {
    async fn locate(&self, at: Coordinates) -> Result<ImageResult> {
        (**self).locate(at).await
    }
}

/// `[lon-0.01, lat-0.01, lon+0.01, lat+0.01]` around `at`.
pub fn bounding_box_for(at: Coordinates) -> BoundingBox {
    BoundingBox::around(at.lat, at.lon, SEARCH_HALF_WIDTH_DEG)
}

/// Talks to the Mapillary Graph API directly. Used by the backend.
pub struct MapillaryLocator {
    client: Option<MapillaryClient>,
}

impl MapillaryLocator {
    pub fn new(client: Option<MapillaryClient>) -> Self {
        Self { client }
    }

    /// Build from config. A missing token yields a locator that fails every
    /// call with a configuration error.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = match &config.mapillary_access_token {
            Some(token) => Some(
                MapillaryClient::new(
                    token.clone(),
                    &config.mapillary_base_url,
                    config.provider_timeout,
                )
                .map_err(|e| GameError::Internal(e.to_string()))?,
            ),
            None => {
                warn!("MAPILLARY_ACCESS_TOKEN is not set; image lookups will fail");
                None
            }
        };
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageLocator for MapillaryLocator {
    async fn locate(&self, at: Coordinates) -> Result<ImageResult> {
        let Some(client) = &self.client else {
            return Err(GameError::Configuration(
                "Mapillary access token is not configured".to_string(),
            ));
        };

        let bbox = bounding_box_for(at);
        let images = client
            .search_panoramas(&bbox, 1)
            .await
            .map_err(provider_error)?;

        let Some(first) = images.into_iter().next() else {
            info!(lat = at.lat, lon = at.lon, "No panorama in search box");
            return Err(GameError::NotFound(NO_PANORAMA.to_string()));
        };

        let image = ImageResult::from_record(first)?;
        info!(image_id = %image.image_id, lat = at.lat, lon = at.lon, "Resolved panorama");
        Ok(image)
    }
}

fn provider_error(err: MapillaryError) -> GameError {
    match err {
        MapillaryError::Api {
            status,
            message,
            body,
        } => {
            warn!(status, %message, "Mapillary API error");
            let message = if body.is_some() {
                message
            } else {
                GENERIC_UPSTREAM.to_string()
            };
            GameError::Upstream {
                status,
                message,
                provider_error: body,
            }
        }
        MapillaryError::Timeout(msg) => {
            warn!(error = %msg, "Mapillary request timed out");
            GameError::Upstream {
                status: 504,
                message: "Timed out waiting for Mapillary".to_string(),
                provider_error: None,
            }
        }
        MapillaryError::Network(msg) | MapillaryError::Parse(msg) => GameError::Internal(msg),
    }
}
