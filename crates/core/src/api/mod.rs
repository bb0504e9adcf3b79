//! Upstream API access.

pub mod client;

pub use client::{FetchError, TrafiklabClient, SL_TRANSPORT_AUTHORITY};
