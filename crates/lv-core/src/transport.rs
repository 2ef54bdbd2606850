//! Transport modes as they appear in simulation exports.
//!
//! Exports carry free-text mode labels.  [`TransportMode::from_label`] maps
//! the known ones; anything else stays a raw string in the record and is
//! handled by the baseline estimator's `Unknown` strategy.

/// Label used for study-area agents that never travel.
pub const INACTIVE_MODE: &str = "inactive";

/// A recognised travel mode.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TransportMode {
    Walk,
    Bike,
    /// Private car, driver.
    Car,
    /// Private car, passenger.
    Ride,
    Freight,
    Truck,
    /// Scheduled public transport.
    Pt,
}

impl TransportMode {
    pub const ALL: [TransportMode; 7] = [
        TransportMode::Walk,
        TransportMode::Bike,
        TransportMode::Car,
        TransportMode::Ride,
        TransportMode::Freight,
        TransportMode::Truck,
        TransportMode::Pt,
    ];

    /// Case-insensitive lookup of an export label.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(label))
    }

    /// Lower-case label, matching the export and network `modes` vocabulary.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Walk    => "walk",
            TransportMode::Bike    => "bike",
            TransportMode::Car     => "car",
            TransportMode::Ride    => "ride",
            TransportMode::Freight => "freight",
            TransportMode::Truck   => "truck",
            TransportMode::Pt      => "pt",
        }
    }

    /// `true` for modes whose baseline is a shortest path on the road network.
    #[inline]
    pub fn is_network_routed(self) -> bool {
        matches!(
            self,
            TransportMode::Car | TransportMode::Ride | TransportMode::Freight | TransportMode::Truck
        )
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
