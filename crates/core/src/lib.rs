//! Departure board pipeline: nearby sites, departures, favorites and the
//! refresh loop that ties them together.

pub mod api;
pub mod board;
pub mod catalog;
pub mod config;
pub mod favorites;
pub mod fetcher;
pub mod position;
pub mod refresh;

#[cfg(test)]
mod testing;

// Re-export transit from the transit crate
pub use nasta_tag_transit as transit;

pub use api::{FetchError, TrafiklabClient};
pub use board::{DepartureBoard, GroupedDepartures, aggregate};
pub use config::BoardConfig;
pub use favorites::{FavoriteStops, FavoritesError, FavoritesStore};
pub use position::{PositionError, PositionSender, PositionStream};
pub use refresh::RefreshController;
