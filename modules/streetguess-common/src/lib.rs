pub mod config;
pub mod error;
pub mod geo;
pub mod types;

pub use config::Config;
pub use error::{GameError, Result};
pub use geo::{haversine_km, score_for_distance, EARTH_RADIUS_KM, MAX_ROUND_SCORE};
pub use types::{seed_locations, Coordinates, Location, ProviderPoint};
