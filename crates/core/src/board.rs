//! Departure aggregation: sort, partition, group by stop, favorites first.
//!
//! The board is recomputed from scratch on every call. Departure counts per
//! cycle are small, and a full recompute cannot drift from its inputs.

use std::collections::HashMap;

use nasta_tag_transit::identifiers::StopKey;
use nasta_tag_transit::models::Departure;

use crate::favorites::FavoriteStops;

/// All departures of one physical stop (name + designation)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupedDepartures {
    pub stop_key: StopKey,
    pub stop_name: String,
    /// Platform or direction label of the stop point
    pub direction: String,
    pub departures: Vec<Departure>,
    pub favorite: bool,
}

/// Grouped view, metro separated from everything else
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepartureBoard {
    pub metro_stops: Vec<GroupedDepartures>,
    pub other_stops: Vec<GroupedDepartures>,
}

impl DepartureBoard {
    pub fn is_empty(&self) -> bool {
        self.metro_stops.is_empty() && self.other_stops.is_empty()
    }
}

/// Stable sort by expected time, falling back to the scheduled time
pub fn sort_departures(departures: &mut [Departure]) {
    departures.sort_by(|a, b| a.effective_time().cmp(b.effective_time()));
}

/// Fold departures into per-stop groups.
///
/// The first departure of a stop fixes the group's name, direction and
/// favorite flag. Structurally identical departures are kept once, which
/// absorbs overlapping sites reporting the same stop. Favorite groups come
/// first; each tier is ordered by stop key.
pub fn group_departures<'a>(
    departures: impl IntoIterator<Item = &'a Departure>,
    favorites: &FavoriteStops,
) -> Vec<GroupedDepartures> {
    let mut groups: Vec<GroupedDepartures> = Vec::new();
    let mut by_key: HashMap<StopKey, usize> = HashMap::new();

    for departure in departures {
        let key = departure.stop_key();
        let index = *by_key.entry(key.clone()).or_insert_with(|| {
            groups.push(GroupedDepartures {
                favorite: favorites.contains(&key),
                stop_name: departure.stop_point.name.clone().unwrap_or_default(),
                direction: departure.stop_point.designation.clone().unwrap_or_default(),
                stop_key: key,
                departures: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[index];
        if !group.departures.contains(departure) {
            group.departures.push(departure.clone());
        }
    }

    groups.sort_by(|a, b| {
        b.favorite
            .cmp(&a.favorite)
            .then_with(|| a.stop_key.cmp(&b.stop_key))
    });
    groups
}

/// Build the whole board from a raw departure list
pub fn aggregate(departures: &[Departure], favorites: &FavoriteStops) -> DepartureBoard {
    let mut sorted = departures.to_vec();
    sort_departures(&mut sorted);

    let (metro, other): (Vec<&Departure>, Vec<&Departure>) =
        sorted.iter().partition(|departure| departure.is_metro());

    DepartureBoard {
        metro_stops: group_departures(metro, favorites),
        other_stops: group_departures(other, favorites),
    }
}
