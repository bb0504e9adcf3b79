//! Departure fetcher: one request per nearby site, merged into one list.
//!
//! Requests run concurrently. If any site fails the whole batch fails, so the
//! caller keeps its previous departure list instead of showing a board that
//! silently mixes fresh and missing stops.

use futures_util::future::try_join_all;
use nasta_tag_transit::models::{Departure, TransitError};
use nasta_tag_transit::network::{DepartureQuery, DepartureSource};
use tracing::{debug, warn};

/// Fetch and flatten departures for every site id, in site order.
///
/// No deduplication happens here; overlapping sites may report the same
/// departure twice.
pub async fn fetch_departures(
    source: &dyn DepartureSource,
    site_ids: &[u32],
    query: &DepartureQuery,
) -> Result<Vec<Departure>, TransitError> {
    let requests = site_ids.iter().map(|&site_id| async move {
        source
            .fetch_departures(site_id, query)
            .await
            .inspect_err(|error| warn!(site_id, %error, "departure request failed"))
    });

    let per_site = try_join_all(requests).await?;
    let departures: Vec<Departure> = per_site.into_iter().flatten().collect();
    debug!(sites = site_ids.len(), count = departures.len(), "departures fetched");

    Ok(departures)
}
