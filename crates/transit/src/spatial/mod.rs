//! Spatial indexing and query utilities.

pub mod index;
pub mod proximity;
pub mod queries;

pub use proximity::{is_within, sites_within, DEFAULT_RADIUS_M};
pub use queries::{haversine_distance, EARTH_RADIUS_M};
