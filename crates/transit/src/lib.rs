//! # nasta-tag-transit
//!
//! Transit data model and nearby-stop resolution for the departure board.
//!
//! ## Features
//!
//! - **Typed upstream model**: sites, stop points, lines and departures
//! - **Spatial queries**: Haversine distance and an R-tree backed site catalog
//! - **Stable identities**: [`StopKey`] groups departures by physical stop
//! - **Pluggable networking**: implement [`SiteSource`] / [`DepartureSource`]
//!
//! ## Example
//!
//! ```
//! use nasta_tag_transit::prelude::*;
//!
//! let slussen = Site {
//!     id: 9192,
//!     gid: 9091001000009192,
//!     lat: Some(59.3195),
//!     lon: Some(18.0722),
//!     name: "Slussen".into(),
//!     alias: None,
//!     abbreviation: None,
//!     note: None,
//!     stop_areas: None,
//!     valid: ValidityPeriod { from: "2015-01-01T00:00:00".into(), to: None },
//! };
//!
//! let catalog = SiteCatalog::from_sites(vec![slussen]);
//!
//! // Query sites
//! let here = Coordinates::new(59.3210, 18.0710);
//! let nearby = catalog.sites_near(here, DEFAULT_RADIUS_M);
//! assert_eq!(nearby.len(), 1);
//! ```

pub mod identifiers;
pub mod models;
pub mod network;
pub mod provider;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::*;
    pub use crate::network::traits::*;
    pub use crate::provider::SiteCatalog;
    pub use crate::spatial::{haversine_distance, sites_within, DEFAULT_RADIUS_M};
}

pub use prelude::*;
