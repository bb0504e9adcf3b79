//! Sites, stop points, lines and the other static upstream entities.

use serde::{Deserialize, Serialize};

use crate::models::types::{StockholmTime, StopAreaType, StopPointType, TransportMode};

/// Period during which an entity is valid
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityPeriod {
    pub from: StockholmTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<StockholmTime>,
}

// ============================================================================
// References
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StopAreaReference {
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sname: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub area_type: Option<StopAreaType>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransportAuthorityReference {
    pub id: u32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractorReference {
    pub id: u32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineReference {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_mode: Option<TransportMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_of_lines: Option<Vec<String>>,
}

// ============================================================================
// Entities
// ============================================================================

/// A physical transit location grouping one or more stop points.
///
/// Sites without coordinates are kept in the catalog but never match a
/// proximity query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: u32,
    pub gid: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_areas: Option<Vec<u32>>,
    pub valid: ValidityPeriod,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StopPoint {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    pub gid: u64,
    pub pattern_point_gid: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sname: Option<String>,
    /// Angle in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub door_orientation: Option<f64>,
    pub has_entrance: bool,
    pub local_num: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_area: Option<StopAreaReference>,
    pub transport_authority: TransportAuthorityReference,
    #[serde(rename = "type")]
    pub point_type: StopPointType,
    pub valid: ValidityPeriod,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportAuthority {
    pub id: u32,
    pub name: String,
    pub gid: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formal_name: Option<String>,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub valid: ValidityPeriod,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    #[serde(flatten)]
    pub reference: LineReference,
    pub gid: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_authority: Option<TransportAuthorityReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contractor: Option<ContractorReference>,
    pub valid: ValidityPeriod,
}

/// All lines of a transport authority, bucketed by mode
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinesResponse {
    #[serde(default)]
    pub metro: Vec<Line>,
    #[serde(default)]
    pub tram: Vec<Line>,
    #[serde(default)]
    pub train: Vec<Line>,
    #[serde(default)]
    pub bus: Vec<Line>,
    #[serde(default)]
    pub ship: Vec<Line>,
    #[serde(default)]
    pub ferry: Vec<Line>,
    #[serde(default)]
    pub taxi: Vec<Line>,
}

impl LinesResponse {
    /// Iterate all lines regardless of mode
    pub fn all(&self) -> impl Iterator<Item = &Line> {
        self.metro
            .iter()
            .chain(&self.tram)
            .chain(&self.train)
            .chain(&self.bus)
            .chain(&self.ship)
            .chain(&self.ferry)
            .chain(&self.taxi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_with_and_without_coordinates() {
        let sites: Vec<Site> = serde_json::from_str(
            r#"[
                {"id": 9192, "gid": 9091001000009192, "lat": 59.319, "lon": 18.072,
                 "name": "Slussen", "valid": {"from": "2015-01-01T00:00:00"}},
                {"id": 1, "gid": 9091001000000001, "name": "Nowhere",
                 "valid": {"from": "2015-01-01T00:00:00", "to": "2030-01-01T00:00:00"}}
            ]"#,
        )
        .unwrap();

        assert_eq!(sites[0].lat, Some(59.319));
        assert_eq!(sites[1].lat, None);
        assert_eq!(sites[1].valid.to.as_deref(), Some("2030-01-01T00:00:00"));
    }

    #[test]
    fn test_lines_response_all() {
        let lines: LinesResponse = serde_json::from_str(
            r#"{
                "metro": [{"id": 13, "gid": 9011001001300000, "name": "Röda linjen",
                           "designation": "13", "transport_mode": "METRO",
                           "valid": {"from": "2015-01-01T00:00:00"}}],
                "bus": [{"id": 4, "gid": 9011001000400000, "name": "Blåbuss",
                         "transport_mode": "BUS",
                         "valid": {"from": "2015-01-01T00:00:00"}}]
            }"#,
        )
        .unwrap();

        let ids: Vec<u32> = lines.all().map(|line| line.reference.id).collect();
        assert_eq!(ids, [13, 4]);
        assert_eq!(lines.metro[0].reference.transport_mode, Some(TransportMode::Metro));
        assert!(lines.taxi.is_empty());
    }
}
