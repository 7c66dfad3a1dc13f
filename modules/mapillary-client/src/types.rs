use serde::{Deserialize, Serialize};

// --- Query types ---

/// Rectangular lon/lat filter in the order the Graph API expects:
/// `[min_lon, min_lat, max_lon, max_lat]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Square box of `half_width` degrees on each side of (lat, lon).
    pub fn around(lat: f64, lon: f64, half_width: f64) -> Self {
        Self {
            min_lon: lon - half_width,
            min_lat: lat - half_width,
            max_lon: lon + half_width,
            max_lat: lat + half_width,
        }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    /// Comma-joined form used for the `bbox` query parameter.
    pub fn to_query_value(&self) -> String {
        self.as_array()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Fields requested for every image search.
pub const IMAGE_FIELDS: &[&str] = &[
    "id",
    "thumb_original_url",
    "thumb_1024_url",
    "computed_geometry",
    "compass_angle",
];

// --- Response types ---

/// GeoJSON point as returned by the Graph API. Coordinates are `[lon, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type", default)]
    pub geometry_type: Option<String>,
    pub coordinates: [f64; 2],
}

/// A single image record from `/images`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub thumb_original_url: Option<String>,
    pub thumb_1024_url: Option<String>,
    pub computed_geometry: Option<PointGeometry>,
    pub compass_angle: Option<f64>,
}

impl ImageRecord {
    /// Original resolution when present, otherwise the 1024px thumbnail.
    pub fn best_url(&self) -> Option<&str> {
        self.thumb_original_url
            .as_deref()
            .or(self.thumb_1024_url.as_deref())
    }
}

/// Wrapper for Graph API list responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}
