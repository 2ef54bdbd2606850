//! `lv-ledger` — the per-agent liveability ledger and its companion tables.
//!
//! Everything an indicator run produces is held in memory and persisted once
//! at the end through a [`LedgerWriter`].
//!
//! | Type                  | Contents                                             |
//! |-----------------------|------------------------------------------------------|
//! | [`Ledger`]            | one row per study-area agent, one column per attribute |
//! | [`SummaryTiles`]      | `{category, value}` headline figures                 |
//! | [`IndicatorCatalogue`]| `{dimension, indicator, median, limit, ranking, weight}` |
//! | [`Table`]             | auxiliary diagnostic tables (per leg, per mode, …)    |
//! | [`XytMap`]            | per-agent values at home coordinates, for map views  |
//! | [`RunOutputs`]        | all of the above for one run                         |
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                       |
//! |-----------|---------|-----------------------------------------------------|
//! | *(none)*  | CSV     | one `<table>.csv` per table, `<map>.xyt.csv` per map |
//! | `sqlite`  | SQLite  | `liveability.db`, one SQL table per table           |
//! | `parquet` | Parquet | one `<table>.parquet` per table                     |
//!
//! # Usage
//!
//! ```rust,ignore
//! use lv_ledger::{CsvLedgerWriter, Ledger, RunOutputs};
//!
//! let mut outputs = RunOutputs::new(Ledger::from_study_area(&area));
//! outputs.ledger.extend_with_attribute(&loss_per_agent, "lossTime")?;
//! outputs.tiles.extend_summary_tile("Loss Time Ranking", "70.00%");
//! outputs.persist(&mut CsvLedgerWriter::new(Path::new("./out"))?)?;
//! ```

pub mod catalogue;
pub mod cell;
pub mod csv;
pub mod error;
pub mod ledger;
pub mod loader;
pub mod outputs;
pub mod table;
pub mod tiles;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use catalogue::{IndicatorCatalogue, IndicatorRecord, INDICATOR_HEADER};
pub use cell::{Cell, ColumnKind};
pub use self::csv::CsvLedgerWriter;
pub use error::{LedgerError, LedgerResult};
pub use ledger::{Ledger, PERSON_COLUMN};
pub use loader::{load_ledger_csv, load_ledger_reader};
pub use outputs::RunOutputs;
pub use table::{Table, XytMap};
pub use tiles::{SummaryTile, SummaryTiles, PLACEHOLDER};
pub use writer::LedgerWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteLedgerWriter;

#[cfg(feature = "parquet")]
pub use self::parquet::ParquetLedgerWriter;
