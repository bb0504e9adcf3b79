use std::fmt;

use nasta_tag_core::board::{DepartureBoard, GroupedDepartures};
use nasta_tag_transit::models::{Departure, TransportMode};

const FAVORITE_MARK: &str = "★";

/// Plain-text rendering of a board: metro stops first, then the rest
pub struct BoardView<'a>(pub &'a DepartureBoard);

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.0;
        if board.is_empty() {
            return writeln!(f, "No departures nearby");
        }

        write_section(f, "Metro", &board.metro_stops)?;
        write_section(f, "Bus, tram, train & boat", &board.other_stops)
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, title: &str, groups: &[GroupedDepartures]) -> fmt::Result {
    if groups.is_empty() {
        return Ok(());
    }

    writeln!(f, "== {title} ==")?;
    for group in groups {
        let mark = if group.favorite { FAVORITE_MARK } else { " " };
        if group.direction.is_empty() {
            writeln!(f, "{mark} {}", group.stop_name)?;
        } else {
            writeln!(f, "{mark} {} ({})", group.stop_name, group.direction)?;
        }
        for departure in &group.departures {
            writeln!(f, "    {}", DepartureLine(departure))?;
        }
    }
    writeln!(f)
}

struct DepartureLine<'a>(&'a Departure);

impl fmt::Display for DepartureLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let departure = self.0;
        write!(
            f,
            "{} {} {} {}",
            TransportMode::emoji(departure.line.transport_mode),
            departure.line.designation.as_deref().unwrap_or("?"),
            departure.destination.as_deref().unwrap_or(&departure.direction),
            departure.display,
        )
    }
}
