//! Transit data models, types, and traits.

pub mod departure;
pub mod site;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use departure::{
    Departure, DepartureDeviation, DepartureJourney, DeviationScope, SiteDeparturesResponse,
    StopDeviation, StopPointReference,
};
pub use site::{
    ContractorReference, Line, LineReference, LinesResponse, Site, StopAreaReference, StopPoint,
    TransportAuthority, TransportAuthorityReference, ValidityPeriod,
};
pub use traits::Located;
pub use types::{
    Coordinates, DepartureState, DirectionCode, JourneyPredictionState, JourneyState,
    PassengerLevel, Result, StockholmTime, StopAreaType, StopPointType, TransitError,
    TransportMode,
};
