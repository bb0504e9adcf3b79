//! Departures as reported by the upstream site departures endpoint.

use serde::{Deserialize, Serialize};

use crate::identifiers::StopKey;
use crate::models::site::{LineReference, StopAreaReference};
use crate::models::types::*;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StopPointReference {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepartureJourney {
    pub id: u64,
    pub state: JourneyState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_state: Option<JourneyPredictionState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_level: Option<PassengerLevel>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepartureDeviation {
    pub importance_level: i32,
    pub consequence: String,
    pub message: String,
}

/// One scheduled or predicted vehicle departure.
///
/// Equality is full structural equality: two departures reported by two
/// overlapping sites are the same departure iff every field matches.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Departure {
    pub direction: String,
    pub direction_code: DirectionCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub state: DepartureState,
    pub scheduled: StockholmTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<StockholmTime>,
    pub display: String,
    pub journey: DepartureJourney,
    pub stop_area: StopAreaReference,
    pub stop_point: StopPointReference,
    pub line: LineReference,
    #[serde(default)]
    pub deviations: Vec<DepartureDeviation>,
}

impl Departure {
    /// Expected time when known, otherwise the scheduled time
    pub fn effective_time(&self) -> &str {
        self.expected.as_deref().unwrap_or(&self.scheduled)
    }

    pub fn stop_key(&self) -> StopKey {
        StopKey::for_stop_point(&self.stop_point)
    }

    pub fn is_metro(&self) -> bool {
        self.line.transport_mode == Some(TransportMode::Metro)
    }
}

/// Scope of a stop deviation; the upstream leaves the element shape open.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviationScope {
    #[serde(default)]
    pub lines: Vec<serde_json::Value>,
    #[serde(default)]
    pub stop_areas: Vec<serde_json::Value>,
    #[serde(default)]
    pub stop_points: Vec<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StopDeviation {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance_level: Option<i32>,
    pub message: String,
    #[serde(default)]
    pub scope: DeviationScope,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteDeparturesResponse {
    #[serde(default)]
    pub departures: Option<Vec<Departure>>,
    #[serde(default)]
    pub stop_deviations: Vec<StopDeviation>,
}

impl SiteDeparturesResponse {
    /// Departures of the response, empty when the field was absent
    pub fn into_departures(self) -> Vec<Departure> {
        self.departures.unwrap_or_default()
    }
}
