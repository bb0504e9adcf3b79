//! HTTP client for the SL transport API.
//!
//! Documentation: https://www.trafiklab.se/api/trafiklab-apis/sl/transport/

use nasta_tag_transit::models::{
    Departure, LinesResponse, Site, SiteDeparturesResponse, StopPoint, TransitError,
    TransportAuthority,
};
use nasta_tag_transit::network::{DepartureQuery, DepartureSource, SiteSource};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

/// Transport authority of Region Stockholm
pub const SL_TRANSPORT_AUTHORITY: u32 = 1;

pub struct TrafiklabClient {
    base_url: String,
    client: reqwest::Client,
}

impl TrafiklabClient {
    /// Client whose requests give up after `timeout`, so a hanging upstream
    /// cannot pile up fetch tasks across refresh cycles
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, client }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// List all sites within Region Stockholm
    pub async fn get_sites(&self) -> Result<Vec<Site>, FetchError> {
        self.get_json("sites", &[("expand", "true".to_owned())]).await
    }

    /// Upcoming departures and deviations for a site, at most three per line
    /// and direction
    pub async fn get_site_departures(
        &self,
        site_id: u32,
        query: &DepartureQuery,
    ) -> Result<SiteDeparturesResponse, FetchError> {
        self.get_json(&format!("sites/{site_id}/departures"), &query.to_query_pairs())
            .await
    }

    /// List all lines of a transport authority
    pub async fn get_lines(&self, transport_authority_id: u32) -> Result<LinesResponse, FetchError> {
        self.get_json(
            "lines",
            &[("transport_authority_id", transport_authority_id.to_string())],
        )
        .await
    }

    pub async fn get_stop_points(&self) -> Result<Vec<StopPoint>, FetchError> {
        self.get_json("stop-points", &[]).await
    }

    pub async fn get_transport_authorities(&self) -> Result<Vec<TransportAuthority>, FetchError> {
        self.get_json("transport-authorities", &[]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint(path);
        debug!(%url, ?query, "upstream request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(FetchError::from_request)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url));
        }

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        response.json().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url)
            } else {
                FetchError::InvalidData(e.to_string())
            }
        })
    }
}

impl SiteSource for TrafiklabClient {
    fn fetch_sites<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = nasta_tag_transit::Result<Vec<Site>>> + Send + 'a>> {
        Box::pin(async move { Ok(self.get_sites().await?) })
    }
}

impl DepartureSource for TrafiklabClient {
    fn fetch_departures<'a>(
        &'a self,
        site_id: u32,
        query: &'a DepartureQuery,
    ) -> Pin<Box<dyn Future<Output = nasta_tag_transit::Result<Vec<Departure>>> + Send + 'a>> {
        Box::pin(async move {
            let response = self.get_site_departures(site_id, query).await?;
            Ok(response.into_departures())
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl FetchError {
    fn from_request(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            let url = e.url().map(|url| url.to_string()).unwrap_or_default();
            Self::Timeout(url)
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<FetchError> for TransitError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotFound(url) => TransitError::NotFound(url),
            FetchError::InvalidData(msg) => TransitError::InvalidData(msg),
            other => TransitError::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_cleanly() {
        let client =
            TrafiklabClient::new("https://transport.integration.sl.se/v1/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            client.endpoint("sites/9192/departures"),
            "https://transport.integration.sl.se/v1/sites/9192/departures"
        );
        assert_eq!(
            client.endpoint("/lines"),
            "https://transport.integration.sl.se/v1/lines"
        );
    }

    #[test]
    fn test_fetch_error_mapping() {
        let error: TransitError = FetchError::NotFound("x".into()).into();
        assert!(matches!(error, TransitError::NotFound(_)));

        let error: TransitError = FetchError::Status(reqwest::StatusCode::BAD_GATEWAY).into();
        assert!(matches!(error, TransitError::Network(msg) if msg.contains("502")));

        let error: TransitError = FetchError::InvalidData("eof".into()).into();
        assert!(matches!(error, TransitError::InvalidData(_)));

        let error: TransitError = FetchError::Timeout("x".into()).into();
        assert!(matches!(error, TransitError::Network(_)));
    }

    #[tokio::test]
    async fn test_silent_upstream_times_out() {
        // accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .no_proxy()
            .build()
            .unwrap();
        let client = TrafiklabClient::with_client(format!("http://{address}/v1"), http);

        let started = std::time::Instant::now();
        let result = client.get_sites().await;
        assert!(matches!(result, Err(FetchError::Timeout(_))), "{result:?}");
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
