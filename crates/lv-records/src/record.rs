//! Typed export records.

use std::collections::{BTreeMap, HashMap};

use lv_core::{AgentId, Coord, TransportMode};

// ── LegRecord ─────────────────────────────────────────────────────────────────

/// One single-mode segment of a trip, as simulated.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegRecord {
    pub agent:          AgentId,
    pub trip_id:        String,
    /// Raw mode label; unrecognised labels are kept.
    pub mode:           String,
    pub trav_time_secs: u64,
    pub dep_time_secs:  u64,
    pub start:          Coord,
    pub end:            Coord,
    pub start_link:     String,
    pub end_link:       String,
    /// Routed distance in metres, when the export carries it.
    pub distance_m:     Option<f64>,
}

impl LegRecord {
    pub fn transport_mode(&self) -> Option<TransportMode> {
        TransportMode::from_label(&self.mode)
    }

    /// Routed distance, or the straight line when the export has none.
    pub fn distance_or_euclidean_m(&self) -> f64 {
        self.distance_m.unwrap_or_else(|| self.start.euclidean_m(self.end))
    }
}

// ── TripRecord ────────────────────────────────────────────────────────────────

/// A door-to-door movement between two activities.  Its legs share
/// `trip_id`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripRecord {
    pub agent:                AgentId,
    pub trip_id:              String,
    pub main_mode:            String,
    pub trav_time_secs:       u64,
    pub dep_time_secs:        u64,
    pub euclidean_distance_m: f64,
    pub start:                Coord,
    pub end:                  Coord,
    pub start_link:           String,
    pub end_link:             String,
}

impl TripRecord {
    pub fn transport_mode(&self) -> Option<TransportMode> {
        TransportMode::from_label(&self.main_mode)
    }
}

// ── StudyArea ─────────────────────────────────────────────────────────────────

/// Agents whose home lies inside the study area, with home coordinates.
///
/// Membership is decided upstream; this is only the lookup.  Iteration is in
/// `AgentId` order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StudyArea {
    homes: BTreeMap<AgentId, Coord>,
}

impl StudyArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent.  A repeated id keeps the first home.
    pub fn insert(&mut self, agent: AgentId, home: Coord) -> bool {
        match self.homes.entry(agent) {
            std::collections::btree_map::Entry::Vacant(v) => {
                v.insert(home);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    #[inline]
    pub fn contains(&self, agent: &AgentId) -> bool {
        self.homes.contains_key(agent)
    }

    pub fn home(&self, agent: &AgentId) -> Option<Coord> {
        self.homes.get(agent).copied()
    }

    pub fn len(&self) -> usize {
        self.homes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.homes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AgentId, Coord)> {
        self.homes.iter().map(|(a, &c)| (a, c))
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentId> {
        self.homes.keys()
    }
}

impl FromIterator<(AgentId, Coord)> for StudyArea {
    fn from_iter<I: IntoIterator<Item = (AgentId, Coord)>>(iter: I) -> Self {
        let mut area = StudyArea::new();
        for (a, c) in iter {
            area.insert(a, c);
        }
        area
    }
}

// ── WalkAccessIndex ───────────────────────────────────────────────────────────

/// Longest walk leg per trip, built once from the leg export.
///
/// Answers "how far did this trip walk at most" in O(1) instead of
/// re-scanning all legs per trip.
#[derive(Clone, Debug, Default)]
pub struct WalkAccessIndex {
    longest_walk_m: HashMap<String, f64>,
}

impl WalkAccessIndex {
    pub fn from_legs<'a>(legs: impl IntoIterator<Item = &'a LegRecord>) -> Self {
        let mut longest_walk_m: HashMap<String, f64> = HashMap::new();
        for leg in legs {
            if leg.transport_mode() != Some(TransportMode::Walk) {
                continue;
            }
            let d = leg.distance_or_euclidean_m();
            longest_walk_m
                .entry(leg.trip_id.clone())
                .and_modify(|m| *m = m.max(d))
                .or_insert(d);
        }
        Self { longest_walk_m }
    }

    /// Longest walk leg of `trip_id`; `None` if the trip had no walk leg.
    pub fn longest_walk_m(&self, trip_id: &str) -> Option<f64> {
        self.longest_walk_m.get(trip_id).copied()
    }

    pub fn len(&self) -> usize {
        self.longest_walk_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.longest_walk_m.is_empty()
    }
}
