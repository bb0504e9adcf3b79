//! Proximity filter over a plain site list.

use crate::models::traits::Located;
use crate::spatial::queries::haversine_distance;
use crate::models::types::Coordinates;

/// Default search radius around the user, in meters
pub const DEFAULT_RADIUS_M: f64 = 1000.0;

/// Whether `item` lies within `radius_m` of `position` (boundary inclusive).
///
/// Items without coordinates never qualify.
pub fn is_within<T: Located + ?Sized>(position: Coordinates, item: &T, radius_m: f64) -> bool {
    item.coordinates()
        .is_some_and(|at| haversine_distance(position, at) <= radius_m)
}

/// Items within `radius_m` of `position`, in input order.
///
/// An empty input or no qualifying item yields an empty list.
pub fn sites_within<'a, T: Located>(
    position: Coordinates,
    sites: &'a [T],
    radius_m: f64,
) -> Vec<&'a T> {
    sites
        .iter()
        .filter(|site| is_within(position, *site, radius_m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::site::{Site, ValidityPeriod};
    use crate::spatial::queries::meters_to_degrees;

    fn site(id: u32, lat: Option<f64>, lon: Option<f64>) -> Site {
        Site {
            id,
            gid: id as u64,
            lat,
            lon,
            name: format!("site {id}"),
            alias: None,
            abbreviation: None,
            note: None,
            stop_areas: None,
            valid: ValidityPeriod { from: "2015-01-01T00:00:00".into(), to: None },
        }
    }

    #[test]
    fn test_only_near_site_qualifies() {
        let position = Coordinates::new(59.33, 18.06);
        let near = site(1, Some(59.33 + meters_to_degrees(500.0)), Some(18.06));
        let far = site(2, Some(59.33 + meters_to_degrees(1500.0)), Some(18.06));

        let sites = [near.clone(), far];
        let found = sites_within(position, &sites, DEFAULT_RADIUS_M);
        assert_eq!(found, [&near]);
    }

    #[test]
    fn test_sites_without_coordinates_never_qualify() {
        let position = Coordinates::new(59.33, 18.06);
        let sites = [site(1, None, Some(18.06)), site(2, Some(59.33), None)];
        assert!(sites_within(position, &sites, f64::INFINITY).is_empty());
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let position = Coordinates::new(59.33, 18.06);
        let edge = Coordinates::new(59.33 + meters_to_degrees(1000.0), 18.06);
        let exact = haversine_distance(position, edge);

        assert!(is_within(position, &edge, exact));
        assert!(!is_within(position, &edge, exact - 0.01));
    }

    #[test]
    fn test_empty_catalog() {
        let sites: [Site; 0] = [];
        assert!(sites_within(Coordinates::new(59.33, 18.06), &sites, 1000.0).is_empty());
    }
}
