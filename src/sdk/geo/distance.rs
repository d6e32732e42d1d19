use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle arithmetic.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coord {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance between two coordinates in kilometers (haversine).
///
/// Total over its domain: coincident points yield 0.0 and the asin operand
/// is clamped so antipodal points cannot produce a NaN from rounding drift.
pub fn great_circle_km(a: Coord, b: Coord) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Distance between two possibly-unresolved endpoints.
pub fn distance_km(a: Option<Coord>, b: Option<Coord>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(great_circle_km(a, b)),
        _ => None,
    }
}

/// Presentation rounding to two decimals. Ranking compares unrounded values
/// so ties are not manufactured by early rounding.
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOSCOW: Coord = Coord {
        latitude: 55.7539,
        longitude: 37.6208,
    };
    const SAINT_PETERSBURG: Coord = Coord {
        latitude: 59.9343,
        longitude: 30.3351,
    };

    #[test]
    fn coincident_points_are_zero() {
        assert_eq!(great_circle_km(MOSCOW, MOSCOW), 0.0);
    }

    #[test]
    fn symmetric() {
        assert_eq!(
            great_circle_km(MOSCOW, SAINT_PETERSBURG),
            great_circle_km(SAINT_PETERSBURG, MOSCOW)
        );
    }

    #[test]
    fn moscow_to_saint_petersburg_is_about_634_km() {
        let km = great_circle_km(MOSCOW, SAINT_PETERSBURG);
        assert!((km - 634.0).abs() < 5.0, "got {km}");
    }

    #[test]
    fn antipodal_points_do_not_panic() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(0.0, 180.0);
        let km = great_circle_km(a, b);
        assert!(km.is_finite());
        assert!((km - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1.0);
    }

    #[test]
    fn absent_endpoint_yields_absent_distance() {
        assert_eq!(distance_km(None, Some(MOSCOW)), None);
        assert_eq!(distance_km(Some(MOSCOW), None), None);
        assert_eq!(distance_km(None, None), None);
        assert!(distance_km(Some(MOSCOW), Some(SAINT_PETERSBURG)).is_some());
    }

    #[test]
    fn rounding_is_two_decimals() {
        assert_eq!(round_km(5.2961), 5.3);
        assert_eq!(round_km(0.005), 0.01);
        assert_eq!(round_km(12.0), 12.0);
    }
}
