use std::time::Duration;

use nasta_tag_transit::network::DepartureQuery;
use nasta_tag_transit::spatial::DEFAULT_RADIUS_M;

/// SL transport API, no key required
pub const DEFAULT_API_URL: &str = "https://transport.integration.sl.se/v1";

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);
pub const CATALOG_RETRY_INTERVAL: Duration = Duration::from_secs(60);
pub const FORECAST_MINUTES: u32 = 30;
/// Upper bound for one upstream request, well inside one refresh interval
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Tuning of the refresh pipeline. The defaults are the production values.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardConfig {
    pub api_base_url: String,
    /// Minimum time between two departure refreshes
    pub refresh_interval: Duration,
    /// How often an empty site catalog is fetched again
    pub catalog_retry_interval: Duration,
    pub radius_m: f64,
    pub forecast_minutes: u32,
    /// Upper bound for one upstream request; see [`Self::http_timeout`]
    pub request_timeout: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_owned(),
            refresh_interval: REFRESH_INTERVAL,
            catalog_retry_interval: CATALOG_RETRY_INTERVAL,
            radius_m: DEFAULT_RADIUS_M,
            forecast_minutes: FORECAST_MINUTES,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl BoardConfig {
    pub fn departure_query(&self) -> DepartureQuery {
        DepartureQuery::with_forecast(self.forecast_minutes)
    }

    /// Request timeout, never longer than one refresh interval
    pub fn http_timeout(&self) -> Duration {
        self.request_timeout.min(self.refresh_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.refresh_interval, Duration::from_millis(60_000));
        assert_eq!(config.radius_m, 1000.0);
        assert_eq!(config.departure_query().forecast, Some(30));
        assert_eq!(config.http_timeout(), REQUEST_TIMEOUT);
        assert!(config.http_timeout() < config.refresh_interval);
    }

    #[test]
    fn test_http_timeout_bounded_by_refresh_interval() {
        let config = BoardConfig {
            refresh_interval: Duration::from_secs(5),
            ..BoardConfig::default()
        };
        assert_eq!(config.http_timeout(), Duration::from_secs(5));
    }
}
