//! `lv-pipeline` — runs the indicator modules over one simulation run.
//!
//! # Run loop
//!
//! ```text
//! RunInputs::load            legs, trips, study area (plain or .gz)
//! Pipeline::run
//!   for module in modules:   in registration order
//!     module.run(ctx)        extends ledger, tiles, catalogue, tables, maps
//! RunOutputs::persist        one LedgerWriter, written once at the end
//! ```
//!
//! The leg loss report is computed on first use and shared by every module
//! through [`RunContext::loss_report`].
//!
//! # Standard modules
//!
//! | Module                 | Reads                         | Adds                               |
//! |------------------------|-------------------------------|------------------------------------|
//! | [`TrafficQuality`]     | trips, loss report            | longest trip and relative loss     |
//! | [`PtQuality`]          | trips, walk index, transit    | pt/car ratio and walk access       |
//! | [`LossTime`]           | loss report                   | per-leg loss tables                |
//! | [`LiveabilitySummary`] | ledger `indexValue_*` columns | overall ranking                    |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                            |
//! |------------|---------------------------------------------------|
//! | `parallel` | Estimates leg baselines on Rayon's thread pool.   |
//! | `sqlite`   | Enables the SQLite ledger writer.                 |
//! | `parquet`  | Enables the Parquet ledger writer.                |

pub mod builder;
pub mod context;
pub mod error;
pub mod inputs;
pub mod module;
pub mod modules;
pub mod observer;
pub mod pipeline;

#[cfg(test)]
mod tests;

pub use builder::PipelineBuilder;
pub use context::RunContext;
pub use error::{ErrorKind, PipelineError, PipelineResult};
pub use inputs::{InputPaths, RunInputs, SkippedRows};
pub use module::IndicatorModule;
pub use modules::{LiveabilitySummary, LossTime, PtQuality, TrafficQuality, INDEX_PREFIX, NO_RANKING};
pub use observer::{LogObserver, NoopObserver, PipelineObserver};
pub use pipeline::{Pipeline, PipelineRun};
