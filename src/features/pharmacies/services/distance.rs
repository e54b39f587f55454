//! Great-circle distance on a sphere of radius 6371 km (haversine).
//!
//! Inputs are not range-checked here; callers validate coordinates first.

use crate::features::pharmacies::models::Coordinates;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two positions in meters (unrounded)
pub fn distance_meters(from: &Coordinates, to: &Coordinates) -> f64 {
    distance_km(from.latitude, from.longitude, to.latitude, to.longitude) * 1000.0
}

/// Wire representation: whole meters, rounded to nearest
pub fn round_meters(meters: f64) -> i64 {
    meters.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_km(32.2462, -8.5298, 32.2462, -8.5298), 0.0);
        assert_eq!(distance_km(-90.0, 180.0, -90.0, 180.0), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let ab = distance_km(32.2462, -8.5298, 31.6295, -7.9811);
        let ba = distance_km(31.6295, -7.9811, 32.2462, -8.5298);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance() {
        // Youssoufia to Marrakech, roughly 85 km great-circle
        let km = distance_km(32.2462, -8.5298, 31.6295, -7.9811);
        assert!(km > 80.0 && km < 90.0, "got {km}");
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let km = distance_km(0.0, 0.0, 1.0, 0.0);
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert!((km - expected).abs() < 1e-6);
    }

    #[test]
    fn test_meters_and_rounding() {
        let a = Coordinates {
            latitude: 0.0,
            longitude: 0.0,
        };
        let b = Coordinates {
            latitude: 0.0,
            longitude: 0.01,
        };
        let meters = distance_meters(&a, &b);
        assert!((meters - 1111.95).abs() < 0.1, "got {meters}");
        assert_eq!(round_meters(meters), 1112);
        assert_eq!(round_meters(0.4), 0);
    }
}
