//! Core traits for transit entities.

use crate::models::site::{Site, StopPoint};
use crate::models::types::Coordinates;

/// An entity that may have a position on the map.
///
/// Upstream entities routinely omit coordinates; anything without both a
/// latitude and a longitude is invisible to spatial queries.
pub trait Located {
    fn coordinates(&self) -> Option<Coordinates>;
}

fn pair(lat: Option<f64>, lon: Option<f64>) -> Option<Coordinates> {
    Some(Coordinates::new(lat?, lon?))
}

impl Located for Site {
    fn coordinates(&self) -> Option<Coordinates> {
        pair(self.lat, self.lon)
    }
}

impl Located for StopPoint {
    fn coordinates(&self) -> Option<Coordinates> {
        pair(self.lat, self.lon)
    }
}

impl Located for Coordinates {
    fn coordinates(&self) -> Option<Coordinates> {
        Some(*self)
    }
}
