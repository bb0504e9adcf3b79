//! Spatial query utilities for distance calculations.
//!
//! Uses Haversine formula for great-circle distances on Earth's surface.

use crate::models::types::Coordinates;

/// Earth's radius in meters used by every distance in this crate
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate Haversine distance between two coordinates in meters.
///
/// NaN inputs propagate to a NaN distance.
pub fn haversine_distance(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Angular distance in degrees covered by `meters` along a great circle
pub fn meters_to_degrees(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_M).to_degrees()
}

/// Conservative `(min, max)` corners, as `[lon, lat]`, of every point within
/// `radius_m` of `center`.
///
/// Returns `None` when the box would contain a pole or wrap the antimeridian;
/// callers must then fall back to a full scan.
pub fn bounding_box(center: Coordinates, radius_m: f64) -> Option<([f64; 2], [f64; 2])> {
    if !center.is_valid() || !radius_m.is_finite() || radius_m < 0.0 {
        return None;
    }

    // Pad against rounding so that sites exactly on the radius stay inside.
    let angular = (radius_m / EARTH_RADIUS_M) * 1.001 + 1e-9;
    let lat = center.lat.to_radians();

    let min_lat = lat - angular;
    let max_lat = lat + angular;
    if min_lat <= -std::f64::consts::FRAC_PI_2 || max_lat >= std::f64::consts::FRAC_PI_2 {
        return None;
    }

    let d_lon = (angular.sin() / lat.cos()).clamp(-1.0, 1.0).asin();
    let min_lon = center.lon.to_radians() - d_lon;
    let max_lon = center.lon.to_radians() + d_lon;
    if min_lon < -std::f64::consts::PI || max_lon > std::f64::consts::PI {
        return None;
    }

    Some((
        [min_lon.to_degrees(), min_lat.to_degrees()],
        [max_lon.to_degrees(), max_lat.to_degrees()],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{HaversineDistance, Point};

    #[test]
    fn test_haversine_distance() {
        // Distance from NYC to LA is approximately 3,936 km
        let nyc = Coordinates::new(40.7128, -74.0060);
        let la = Coordinates::new(34.0522, -118.2437);

        let dist = haversine_distance(nyc, la);
        assert!((dist - 3_936_000.0).abs() < 50_000.0); // Within 50km
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_on_self() {
        let slussen = Coordinates::new(59.3195, 18.0722);
        let odenplan = Coordinates::new(59.3430, 18.0497);

        assert_eq!(
            haversine_distance(slussen, odenplan),
            haversine_distance(odenplan, slussen)
        );
        assert_eq!(haversine_distance(slussen, slussen), 0.0);
    }

    #[test]
    fn test_distance_nan_propagates() {
        let a = Coordinates::new(f64::NAN, 18.0);
        let b = Coordinates::new(59.0, 18.0);
        assert!(haversine_distance(a, b).is_nan());
    }

    #[test]
    fn test_matches_geo_within_radius_difference() {
        // geo uses the mean radius 6371008.8 m, so results differ by that ratio only.
        let a = Coordinates::new(59.33, 18.06);
        let b = Coordinates::new(59.35, 18.10);

        let ours = haversine_distance(a, b);
        let theirs = Point::from(a).haversine_distance(&Point::from(b));
        assert_relative_eq!(ours / EARTH_RADIUS_M, theirs / 6_371_008.8, max_relative = 1e-9);
    }

    #[test]
    fn test_bounding_box_contains_radius() {
        let center = Coordinates::new(59.33, 18.06);
        let (min, max) = bounding_box(center, 1000.0).unwrap();

        let north = Coordinates::new(center.lat + meters_to_degrees(1000.0), center.lon);
        assert!(north.lat <= max[1]);
        assert!(center.lat - meters_to_degrees(1000.0) >= min[1]);

        // Due east at exactly 1000 m must fit too
        let mut east = center;
        while haversine_distance(center, east) < 1000.0 {
            east.lon += 1e-6;
        }
        assert!(east.lon - 1e-6 <= max[0]);
    }

    #[test]
    fn test_bounding_box_fallbacks() {
        assert!(bounding_box(Coordinates::new(89.9999, 0.0), 1000.0).is_none());
        assert!(bounding_box(Coordinates::new(0.0, 179.9999), 1000.0).is_none());
        assert!(bounding_box(Coordinates::new(0.0, 0.0), f64::INFINITY).is_none());
        assert!(bounding_box(Coordinates::new(f64::NAN, 0.0), 1000.0).is_none());
    }
}
