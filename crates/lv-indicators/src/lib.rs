//! `lv-indicators` — per-agent and per-mode travel-time indicators.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`loss`]       | `LossCalculator`: per-leg loss, per-agent and per-mode sums |
//! | [`longest`]    | longest trip per agent, judged by deviation from mode limit |
//! | [`pt_quality`] | pt/car travel-time ratio and walk-access distance         |
//! | [`ranking`]    | deviation, `RankingSummary`, composite, percent format    |
//! | [`stats`]      | NaN-free mean and median                                  |
//! | [`error`]      | `IndicatorError`, `IndicatorResult<T>`                    |
//!
//! Every calculator is scoped by a `StudyArea`: records of agents outside it
//! are ignored, and agents inside it that never travel still get a result.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Leg baselines are estimated on Rayon's pool.             |

pub mod error;
pub mod longest;
pub mod loss;
pub mod pt_quality;
pub mod ranking;
pub mod stats;


pub use error::{IndicatorError, IndicatorResult};
pub use longest::{longest_trips, AgentLongestTrip, ModeLongest};
pub use loss::{leg_loss, AgentLoss, LegLoss, LossCalculator, LossReport, ModeLoss};
pub use pt_quality::{PtCarComparison, PtQualityCalculator, PtQualityReport, WalkAccess};
pub use ranking::{composite, deviation, format_percent, RankingSummary};
pub use stats::{mean, median};
