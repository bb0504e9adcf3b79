//! Core data types and enums for transit data.

use geo::Point;
use serde::{Deserialize, Serialize};

// ============================================================================
// Enums
// ============================================================================

/// Mode of transport reported on a line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransportMode {
    Bus,
    Tram,
    Metro,
    Train,
    Ferry,
    Ship,
    Taxi,
    #[serde(other)]
    Unknown,
}

impl TransportMode {
    /// Upstream spelling, as used in query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bus => "BUS",
            Self::Tram => "TRAM",
            Self::Metro => "METRO",
            Self::Train => "TRAIN",
            Self::Ferry => "FERRY",
            Self::Ship => "SHIP",
            Self::Taxi => "TAXI",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Glyph shown next to a departure on the board
    pub fn emoji(mode: Option<Self>) -> &'static str {
        match mode {
            Some(Self::Metro) => "🚇",
            Some(Self::Bus) => "🚌",
            Some(Self::Train) => "🚆",
            Some(Self::Tram) => "🚋",
            Some(Self::Ship) => "⛴️",
            Some(Self::Ferry) => "🛥️",
            Some(Self::Taxi) => "🚕",
            Some(Self::Unknown) | None => "❓",
        }
    }
}

/// Line direction (0 = unidentified, 1 = forward, 2 = backward).
///
/// Codes outside that range decode to `Unknown` and keep their raw value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum DirectionCode {
    Unidentified,
    Forward,
    Backward,
    Unknown(u8),
}

impl From<u8> for DirectionCode {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Unidentified,
            1 => Self::Forward,
            2 => Self::Backward,
            other => Self::Unknown(other),
        }
    }
}

impl From<DirectionCode> for u8 {
    fn from(value: DirectionCode) -> Self {
        match value {
            DirectionCode::Unidentified => 0,
            DirectionCode::Forward => 1,
            DirectionCode::Backward => 2,
            DirectionCode::Unknown(raw) => raw,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DepartureState {
    NotExpected,
    NotCalled,
    Expected,
    Cancelled,
    Inhibited,
    AtStop,
    Boarding,
    BoardingClosed,
    Departed,
    Passed,
    Missed,
    Replaced,
    AssumedDeparted,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JourneyState {
    NotExpected,
    NotRun,
    Expected,
    Assigned,
    Cancelled,
    SignedOn,
    AtOrigin,
    FastProgress,
    NormalProgress,
    SlowProgress,
    NoProgress,
    OffRoute,
    Aborted,
    Completed,
    AssumedCompleted,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JourneyPredictionState {
    Normal,
    LostContact,
    Unreliable,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PassengerLevel {
    Empty,
    SeatsAvailable,
    StandingPassengers,
    PassengersLeftBehind,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StopAreaType {
    BusTerm,
    MetroStn,
    TramStn,
    RailwStn,
    ShipBer,
    FerryBer,
    Airport,
    TaxiTerm,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StopPointType {
    Platform,
    BusStop,
    Entrance,
    Exit,
    Gate,
    Refuge,
    Pier,
    Track,
    #[serde(other)]
    Unknown,
}

// ============================================================================
// Data Structures
// ============================================================================

/// A WGS84 position in decimal degrees.
///
/// Replaced wholesale on every position update, never patched.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and inside the WGS84 latitude/longitude ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<Coordinates> for Point {
    fn from(value: Coordinates) -> Self {
        Point::new(value.lon, value.lat)
    }
}

/// Upstream local timestamp, e.g. `2024-01-15T08:01:00`.
///
/// The upstream format is fixed-width and zero padded, so byte-wise string
/// ordering is chronological ordering.
pub type StockholmTime = String;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
