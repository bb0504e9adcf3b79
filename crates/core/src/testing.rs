//! Fakes for the upstream collaborators.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use nasta_tag_transit::models::{
    Departure, DepartureJourney, DepartureState, DirectionCode, JourneyState, LineReference,
    Site, StopAreaReference, StopPointReference, TransitError, TransportMode, ValidityPeriod,
};
use nasta_tag_transit::network::{DepartureQuery, DepartureSource, SiteSource};

pub fn site(id: u32, lat: f64, lon: f64) -> Site {
    Site {
        id,
        gid: 9091001000000000 + id as u64,
        lat: Some(lat),
        lon: Some(lon),
        name: format!("site {id}"),
        alias: None,
        abbreviation: None,
        note: None,
        stop_areas: None,
        valid: ValidityPeriod { from: "2015-01-01T00:00:00".into(), to: None },
    }
}

pub fn departure(
    stop: &str,
    designation: Option<&str>,
    mode: TransportMode,
    expected: Option<&str>,
    scheduled: &str,
) -> Departure {
    Departure {
        direction: "Centrum".into(),
        direction_code: DirectionCode::Forward,
        via: None,
        destination: Some("Centrum".into()),
        state: DepartureState::Expected,
        scheduled: scheduled.into(),
        expected: expected.map(Into::into),
        display: "Nu".into(),
        journey: DepartureJourney {
            id: 1,
            state: JourneyState::NormalProgress,
            prediction_state: None,
            passenger_level: None,
        },
        stop_area: StopAreaReference {
            id: 10,
            name: stop.into(),
            sname: None,
            area_type: None,
        },
        stop_point: StopPointReference {
            id: 100,
            name: Some(stop.into()),
            designation: designation.map(Into::into),
        },
        line: LineReference {
            id: 17,
            designation: Some("17".into()),
            transport_mode: Some(mode),
            group_of_lines: None,
        },
        deviations: Vec::new(),
    }
}

/// Site list that can be told to fail a number of times first
#[derive(Default)]
pub struct FakeSites {
    pub sites: Vec<Site>,
    pub failures_left: AtomicUsize,
    pub calls: AtomicUsize,
}

impl FakeSites {
    pub fn new(sites: Vec<Site>) -> Self {
        Self { sites, ..Self::default() }
    }

    pub fn failing_first(sites: Vec<Site>, failures: usize) -> Self {
        Self {
            sites,
            failures_left: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }
}

impl SiteSource for FakeSites {
    fn fetch_sites<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = nasta_tag_transit::Result<Vec<Site>>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let failing = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok();
            if failing {
                return Err(TransitError::Network("sites unavailable".into()));
            }
            Ok(self.sites.clone())
        })
    }
}

/// Per-site departures; every call is counted and can be delayed or failed.
///
/// Each returned departure's `display` is overwritten with `call {n}` so tests
/// can tell refresh cycles apart.
#[derive(Default)]
pub struct FakeDepartures {
    pub by_site: HashMap<u32, Vec<Departure>>,
    pub calls: AtomicUsize,
    pub delays: Mutex<HashMap<usize, Duration>>,
    pub failing_calls: Mutex<HashSet<usize>>,
    pub failing_sites: Mutex<HashSet<u32>>,
    pub queries: Mutex<Vec<(u32, DepartureQuery)>>,
}

impl FakeDepartures {
    pub fn new(by_site: HashMap<u32, Vec<Departure>>) -> Self {
        Self { by_site, ..Self::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DepartureSource for FakeDepartures {
    fn fetch_departures<'a>(
        &'a self,
        site_id: u32,
        query: &'a DepartureQuery,
    ) -> Pin<Box<dyn Future<Output = nasta_tag_transit::Result<Vec<Departure>>> + Send + 'a>> {
        Box::pin(async move {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.queries.lock().unwrap().push((site_id, query.clone()));

            let delay = self.delays.lock().unwrap().get(&call).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let failing = self.failing_calls.lock().unwrap().contains(&call)
                || self.failing_sites.lock().unwrap().contains(&site_id);
            if failing {
                return Err(TransitError::Network(format!("site {site_id} timed out")));
            }

            Ok(self
                .by_site
                .get(&site_id)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|mut departure| {
                    departure.display = format!("call {call}");
                    departure
                })
                .collect())
        })
    }
}
