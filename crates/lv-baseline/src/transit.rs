//! Transit-routing collaborator.

use lv_core::{Coord, TransportMode};

/// One leg of a transit itinerary.
#[derive(Clone, Debug, PartialEq)]
pub struct ItineraryLeg {
    pub mode:        String,
    pub travel_secs: f64,
    pub distance_m:  f64,
}

/// A routed public-transport itinerary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Itinerary {
    pub legs: Vec<ItineraryLeg>,
}

impl Itinerary {
    /// Door-to-door travel time, access and egress walks included.
    pub fn total_secs(&self) -> f64 {
        self.legs.iter().map(|l| l.travel_secs).sum()
    }

    /// Longest walk leg; `None` if the itinerary has no walk leg.
    pub fn longest_walk_m(&self) -> Option<f64> {
        self.legs
            .iter()
            .filter(|l| TransportMode::from_label(&l.mode) == Some(TransportMode::Walk))
            .map(|l| l.distance_m)
            .reduce(f64::max)
    }
}

/// Schedule-based router for public transport.
///
/// Implementations must be `Send + Sync` (see the `parallel` feature).
pub trait TransitRouter: Send + Sync {
    /// Best itinerary departing at `departure_secs` after midnight; `None`
    /// when no connection exists.
    fn route(&self, origin: Coord, destination: Coord, departure_secs: u64) -> Option<Itinerary>;
}

/// A transit router that never finds a connection.
///
/// The default collaborator when no schedule is available.
pub struct NoTransit;

impl TransitRouter for NoTransit {
    fn route(&self, _origin: Coord, _destination: Coord, _departure_secs: u64) -> Option<Itinerary> {
        None
    }
}
