use std::future::Future;
use std::sync::Arc;

use futures_util::StreamExt;
use nasta_tag_transit::models::{Coordinates, Departure, TransitError};
use nasta_tag_transit::network::{DepartureQuery, DepartureSource, SiteSource};
use nasta_tag_transit::provider::SiteCatalog;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::board::{self, DepartureBoard};
use crate::catalog::load_catalog;
use crate::config::BoardConfig;
use crate::favorites::FavoriteStops;
use crate::fetcher::fetch_departures;
use crate::position::{PositionError, PositionStream};
use crate::refresh::throttle::{Admission, Throttle};

type FetchOutcome = (u64, Result<Vec<Departure>, TransitError>);

/// Drives the pipeline: position and catalog in, aggregated board out.
///
/// All state lives on one task. Network calls run as spawned tasks whose
/// results come back into the loop, so no state is shared across threads.
/// A refresh is triggered by the interval timer, by a position update and by
/// the catalog finishing to load, and only proceeds with a non-empty catalog
/// and a known position.
pub struct RefreshController {
    config: BoardConfig,
    query: DepartureQuery,
    site_source: Arc<dyn SiteSource>,
    departure_source: Arc<dyn DepartureSource>,
    favorites: watch::Receiver<FavoriteStops>,
    board: watch::Sender<Arc<DepartureBoard>>,

    catalog: SiteCatalog,
    position: Option<Coordinates>,
    departures: Vec<Departure>,
    throttle: Throttle,
    /// Sequence number of the latest refresh cycle
    sequence: u64,
    sensor_failure_logged: bool,
}

impl RefreshController {
    pub fn new(
        config: BoardConfig,
        site_source: Arc<dyn SiteSource>,
        departure_source: Arc<dyn DepartureSource>,
        favorites: watch::Receiver<FavoriteStops>,
    ) -> Self {
        let (board, _) = watch::channel(Arc::new(DepartureBoard::default()));
        Self {
            query: config.departure_query(),
            throttle: Throttle::new(config.refresh_interval),
            config,
            site_source,
            departure_source,
            favorites,
            board,
            catalog: SiteCatalog::new(),
            position: None,
            departures: Vec::new(),
            sequence: 0,
            sensor_failure_logged: false,
        }
    }

    /// Board snapshots; every published board is complete
    pub fn subscribe(&self) -> watch::Receiver<Arc<DepartureBoard>> {
        self.board.subscribe()
    }

    pub async fn run(mut self, mut positions: PositionStream, shutdown: impl Future<Output = ()>) {
        let mut refresh_tick = time::interval(self.config.refresh_interval);
        refresh_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut catalog_tick = time::interval(self.config.catalog_retry_interval);
        catalog_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut catalog_loads: JoinSet<Result<SiteCatalog, TransitError>> = JoinSet::new();
        let mut fetches: JoinSet<FetchOutcome> = JoinSet::new();
        let mut positions_open = true;
        let mut favorites_open = true;
        tokio::pin!(shutdown);

        loop {
            let trailing = self.throttle.pending_deadline();

            tokio::select! {
                _ = &mut shutdown => {
                    info!("refresh controller stopped");
                    break;
                }
                _ = catalog_tick.tick() => {
                    if self.catalog.is_empty() && catalog_loads.is_empty() {
                        let source = Arc::clone(&self.site_source);
                        catalog_loads.spawn(async move { load_catalog(&*source).await });
                    }
                }
                Some(joined) = catalog_loads.join_next() => {
                    self.on_catalog(joined, &mut fetches);
                }
                reading = positions.next(), if positions_open => match reading {
                    Some(reading) => self.on_position(reading, &mut fetches),
                    None => {
                        debug!("position source ended");
                        positions_open = false;
                    }
                },
                Some(joined) = fetches.join_next() => {
                    self.on_departures(joined);
                }
                changed = self.favorites.changed(), if favorites_open => match changed {
                    Ok(()) => {
                        debug!("favorites changed");
                        self.publish();
                    }
                    Err(_) => favorites_open = false,
                },
                _ = refresh_tick.tick() => {
                    self.trigger(&mut fetches);
                }
                _ = time::sleep_until(trailing.unwrap_or_else(Instant::now)), if trailing.is_some() => {
                    self.throttle.clear_pending();
                    self.trigger(&mut fetches);
                }
            }
        }
    }

    fn on_catalog(
        &mut self,
        joined: Result<Result<SiteCatalog, TransitError>, JoinError>,
        fetches: &mut JoinSet<FetchOutcome>,
    ) {
        match joined {
            Ok(Ok(catalog)) if catalog.is_empty() => {
                warn!("site catalog is empty, retrying later");
            }
            Ok(Ok(catalog)) => {
                self.catalog = catalog;
                self.trigger(fetches);
            }
            Ok(Err(e)) => warn!(error = %e, "loading site catalog failed, retrying later"),
            Err(e) => error!(error = %e, "site catalog task failed"),
        }
    }

    fn on_position(
        &mut self,
        reading: Result<Coordinates, PositionError>,
        fetches: &mut JoinSet<FetchOutcome>,
    ) {
        match reading {
            Ok(position) if self.position == Some(position) => {
                debug!("position unchanged");
            }
            Ok(position) if position.is_valid() => {
                self.position = Some(position);
                self.trigger(fetches);
            }
            Ok(position) => {
                let e = PositionError::Malformed(format!("{},{}", position.lat, position.lon));
                warn!(error = %e, "ignoring position reading");
            }
            Err(e @ PositionError::Malformed(_)) => warn!(error = %e, "ignoring position reading"),
            Err(e) => {
                if !self.sensor_failure_logged {
                    warn!(error = %e, "no position available, board stays idle");
                    self.sensor_failure_logged = true;
                }
            }
        }
    }

    fn on_departures(&mut self, joined: Result<FetchOutcome, JoinError>) {
        let (sequence, result) = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "departure task failed");
                return;
            }
        };

        if sequence != self.sequence {
            debug!(sequence, latest = self.sequence, "discarding superseded departures");
            return;
        }

        match result {
            Ok(departures) => {
                info!(sequence, count = departures.len(), "departures refreshed");
                self.departures = departures;
                self.publish();
            }
            Err(e) => warn!(sequence, error = %e, "refresh failed, keeping previous departures"),
        }
    }

    fn trigger(&mut self, fetches: &mut JoinSet<FetchOutcome>) {
        let Some(position) = self.position else {
            debug!("refresh skipped, no position yet");
            return;
        };
        if self.catalog.is_empty() {
            debug!("refresh skipped, site catalog not loaded");
            return;
        }

        if let Admission::Deferred(until) = self.throttle.try_acquire(Instant::now()) {
            let wait = until.saturating_duration_since(Instant::now());
            debug!(wait_ms = wait.as_millis() as u64, "refresh throttled");
            return;
        }

        self.sequence += 1;
        let sequence = self.sequence;
        let site_ids: Vec<u32> = self
            .catalog
            .sites_near(position, self.config.radius_m)
            .iter()
            .map(|site| site.id)
            .collect();
        debug!(sequence, sites = site_ids.len(), "refreshing departures");

        let source = Arc::clone(&self.departure_source);
        let query = self.query.clone();
        fetches.spawn(async move {
            let result = fetch_departures(&*source, &site_ids, &query).await;
            (sequence, result)
        });
    }

    fn publish(&mut self) {
        let favorites = self.favorites.borrow_and_update().clone();
        let board = board::aggregate(&self.departures, &favorites);
        self.board.send_replace(Arc::new(board));
    }
}
