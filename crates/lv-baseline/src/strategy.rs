//! The closed set of baseline strategies.

use lv_core::TransportMode;

/// How the baseline for a mode label is obtained.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ModeStrategy {
    Walk,
    Bike,
    /// Shortest free-flow path on links allowing the mode.
    Network(TransportMode),
    Pt,
    Unknown,
}

impl ModeStrategy {
    /// Resolve an export mode label (case-insensitive).
    pub fn for_label(label: &str) -> Self {
        match TransportMode::from_label(label) {
            Some(m) => Self::for_mode(m),
            None => ModeStrategy::Unknown,
        }
    }

    pub fn for_mode(mode: TransportMode) -> Self {
        match mode {
            TransportMode::Walk => ModeStrategy::Walk,
            TransportMode::Bike => ModeStrategy::Bike,
            TransportMode::Pt   => ModeStrategy::Pt,
            m @ (TransportMode::Car
            | TransportMode::Ride
            | TransportMode::Freight
            | TransportMode::Truck) => ModeStrategy::Network(m),
        }
    }
}
