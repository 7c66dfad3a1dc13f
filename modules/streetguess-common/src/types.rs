use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// A WGS84 point in (lat, lon) order. Everything in the game reasons in this
/// order; provider payloads convert through [`ProviderPoint`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Validate untrusted input: finite and inside the WGS84 range.
    pub fn checked(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(GameError::Validation(
                "lat and lon must be finite numbers".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GameError::Validation(format!(
                "lat must be between -90 and 90, got {lat}"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GameError::Validation(format!(
                "lon must be between -180 and 180, got {lon}"
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Parse raw query-string values, as received over HTTP.
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Result<Self> {
        let (Some(lat), Some(lon)) = (lat, lon) else {
            return Err(GameError::Validation(
                "Missing lat or lon query parameter".to_string(),
            ));
        };
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| GameError::Validation(format!("lat is not a number: {lat:?}")))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| GameError::Validation(format!("lon is not a number: {lon:?}")))?;
        Self::checked(lat, lon)
    }
}

/// Provider-order point, `[lon, lat]`, exactly as the imagery API reports it.
/// Serializes as a bare two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderPoint(pub [f64; 2]);

impl ProviderPoint {
    pub fn lon(&self) -> f64 {
        self.0[0]
    }

    pub fn lat(&self) -> f64 {
        self.0[1]
    }
}

impl From<ProviderPoint> for Coordinates {
    fn from(point: ProviderPoint) -> Self {
        Coordinates {
            lat: point.lat(),
            lon: point.lon(),
        }
    }
}

impl From<Coordinates> for ProviderPoint {
    fn from(c: Coordinates) -> Self {
        ProviderPoint([c.lon, c.lat])
    }
}

/// A fixed place a round is played against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub coordinates: Coordinates,
}

impl Location {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            coordinates: Coordinates::new(lat, lon),
        }
    }
}

/// The five locations a game is played through, in order.
pub fn seed_locations() -> Vec<Location> {
    vec![
        Location::new("New York City", 40.7128, -74.0060),
        Location::new("Paris", 48.8566, 2.3522),
        Location::new("Tokyo", 35.6762, 139.6503),
        Location::new("Sydney", -33.8688, 151.2093),
        Location::new("Rio de Janeiro", -22.9068, -43.1729),
    ]
}
