use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use streetguess_common::Coordinates;

use crate::error::ApiError;
use crate::AppState;

/// Raw query values; parsed by hand so bad input gets our 400 body rather
/// than axum's rejection.
#[derive(Deserialize)]
pub struct ImageQuery {
    lat: Option<String>,
    lon: Option<String>,
}

/// `GET /api/getMapillaryImage?lat=..&lon=..`
pub async fn api_get_mapillary_image(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ImageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let at = Coordinates::parse(params.lat.as_deref(), params.lon.as_deref())?;
    let image = state.locator.locate(at).await?;
    Ok(Json(image))
}
