//! `lv-core` — foundational types for the liveability indicator engine.
//!
//! This crate is a dependency of every other `lv-*` crate.  It has no `lv-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`, `EdgeId`                           |
//! | [`geo`]         | `Coord`, euclidean distance                             |
//! | [`time`]        | `HH:MM:SS` parsing/formatting, departure intervals      |
//! | [`transport`]   | `TransportMode` enum, the `"inactive"` label            |
//! | [`limit`]       | `Limit`, `deviation`                                    |
//! | [`config`]      | `LiveabilityConfig` and its sections                    |
//! | [`error`]       | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod limit;
pub mod time;
pub mod transport;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    BaselineConfig, ClampedLegPolicy, LimitsConfig, LiveabilityConfig, PtPolicy,
    TripDurationLimits,
};
pub use error::{CoreError, CoreResult};
pub use geo::Coord;
pub use ids::{AgentId, EdgeId, NodeId};
pub use limit::{deviation, Limit, UNBOUNDED_DEVIATION};
pub use transport::{TransportMode, INACTIVE_MODE};
