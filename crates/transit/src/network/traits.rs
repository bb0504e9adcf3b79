//! Pluggable networking traits.
//!
//! External crates implement these to provide upstream data. The pipeline
//! only ever talks to these traits, never to an HTTP client directly.

use std::future::Future;
use std::pin::Pin;

use crate::models::{
    departure::Departure,
    site::Site,
    types::{DirectionCode, Result, TransportMode},
};

/// Optional filters for a site departures request.
///
/// Only the fields that are set end up in the request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepartureQuery {
    pub transport: Option<TransportMode>,
    pub direction: Option<DirectionCode>,
    pub line: Option<u32>,
    /// Minutes ahead to include. The upstream never returns more than three
    /// departures per line and direction, whatever the window.
    pub forecast: Option<u32>,
}

impl DepartureQuery {
    pub fn with_forecast(minutes: u32) -> Self {
        Self {
            forecast: Some(minutes),
            ..Self::default()
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(transport) = self.transport {
            pairs.push(("transport", transport.as_str().to_owned()));
        }
        if let Some(direction) = self.direction {
            pairs.push(("direction", u8::from(direction).to_string()));
        }
        if let Some(line) = self.line {
            pairs.push(("line", line.to_string()));
        }
        if let Some(forecast) = self.forecast {
            pairs.push(("forecast", forecast.to_string()));
        }
        pairs
    }
}

/// Fetch the full list of known sites
pub trait SiteSource: Send + Sync {
    fn fetch_sites<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<Vec<Site>>> + Send + 'a>>;
}

/// Fetch upcoming departures for a single site
pub trait DepartureSource: Send + Sync {
    fn fetch_departures<'a>(
        &'a self,
        site_id: u32,
        query: &'a DepartureQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Departure>>> + Send + 'a>>;
}
