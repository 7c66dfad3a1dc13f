use crate::types::Coordinates;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub const MAX_ROUND_SCORE: u32 = 5000;

/// Anything at or inside this distance earns the full score.
pub const PERFECT_RADIUS_KM: f64 = 0.25;

/// Anything beyond this distance earns nothing.
pub const ZERO_SCORE_DISTANCE_KM: f64 = 2000.0;

/// Points lost per kilometre between the two thresholds.
pub const POINTS_PER_KM: f64 = 2.5;

/// Haversine great-circle distance between two (lat, lon) points in kilometers.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Round score for a guess `distance_km` away from the true location.
///
/// Flat maximum within [`PERFECT_RADIUS_KM`], zero beyond
/// [`ZERO_SCORE_DISTANCE_KM`], linear in between. Always in `0..=5000`.
pub fn score_for_distance(distance_km: f64) -> u32 {
    if distance_km <= PERFECT_RADIUS_KM {
        return MAX_ROUND_SCORE;
    }
    if distance_km > ZERO_SCORE_DISTANCE_KM {
        return 0;
    }
    let raw = (MAX_ROUND_SCORE as f64 - distance_km * POINTS_PER_KM).round();
    raw.clamp(0.0, MAX_ROUND_SCORE as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64, lon: f64) -> Coordinates {
        Coordinates { lat, lon }
    }

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine_km(at(0.0, 0.0), at(0.0, 0.0)), 0.0);
    }

    #[test]
    fn quarter_great_circle() {
        let dist = haversine_km(at(0.0, 0.0), at(0.0, 90.0));
        let expected = EARTH_RADIUS_KM * std::f64::consts::FRAC_PI_2;
        assert!((dist - expected).abs() < 1e-6, "got {dist}");
        assert!((dist - 10007.5).abs() < 0.1, "got {dist}");
    }

    #[test]
    fn sf_to_la() {
        let dist = haversine_km(at(37.7749, -122.4194), at(34.0522, -118.2437));
        assert!((dist - 559.1).abs() < 1.0, "SF to LA should be ~559km, got {dist}");
    }

    #[test]
    fn antipodes_are_half_circumference() {
        let dist = haversine_km(at(0.0, 0.0), at(0.0, 180.0));
        assert!((dist - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = at(48.8566, 2.3522);
        let b = at(-33.8688, 151.2093);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn close_guess_scores_max() {
        assert_eq!(score_for_distance(0.0), 5000);
        assert_eq!(score_for_distance(0.1), 5000);
    }

    #[test]
    fn near_boundary_is_inclusive() {
        assert_eq!(score_for_distance(0.25), 5000);
        // Just past the boundary the linear formula takes over.
        assert_eq!(score_for_distance(0.26), 4999);
    }

    #[test]
    fn far_boundary_uses_formula_at_2000() {
        // round(5000 - 2000 * 2.5) == 0 via the formula, not the cutoff.
        assert_eq!(score_for_distance(2000.0), 0);
        assert_eq!(score_for_distance(1999.0), 3);
        assert_eq!(score_for_distance(2000.01), 0);
        assert_eq!(score_for_distance(20_000.0), 0);
    }

    #[test]
    fn linear_region() {
        assert_eq!(score_for_distance(1000.0), 2500);
        assert_eq!(score_for_distance(1.0), 4998);
        // 5000 - 1.3 * 2.5 = 4996.75 rounds up
        assert_eq!(score_for_distance(1.3), 4997);
    }

    #[test]
    fn new_york_guess_scores_4996() {
        let truth = at(40.7128, -74.0060);
        let guess = at(40.7000, -74.0100);
        let dist = haversine_km(guess, truth);
        assert!((dist - 1.4627).abs() < 0.001, "got {dist}");
        assert_eq!(score_for_distance(dist), 4996);
    }
}
