//! `lv-baseline` — free-flow travel-time estimation.
//!
//! Every indicator that needs "how long would this movement take without
//! congestion or waiting" goes through [`BaselineEstimator::estimate`].  Mode
//! dispatch lives in one place, [`ModeStrategy`], so the indicator modules
//! cannot drift apart in how they treat a mode.
//!
//! | Mode                        | Strategy      | Baseline                                  |
//! |-----------------------------|---------------|-------------------------------------------|
//! | walk, bike                  | teleported    | beeline distance × factor ÷ speed          |
//! | car, ride, freight, truck   | network       | free-flow shortest path, fallback on fail |
//! | pt                          | transit       | pass-through or transit router            |
//! | anything else               | unknown       | none (`Baseline::Unsupported`)            |
//!
//! Routing diagnostics are collected in a caller-owned [`RoutingTally`].
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | `estimate_batch` runs on Rayon; results are identical.   |

pub mod error;
pub mod estimator;
pub mod strategy;
pub mod tally;
pub mod transit;


pub use error::{BaselineError, BaselineResult};
pub use estimator::{Baseline, BaselineEstimator, BaselineRequest, BaselineSource, TransitEstimate};
pub use strategy::ModeStrategy;
pub use tally::RoutingTally;
pub use transit::{Itinerary, ItineraryLeg, NoTransit, TransitRouter};
