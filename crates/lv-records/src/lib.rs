//! `lv-records` — typed records read from simulation exports.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`record`]   | `LegRecord`, `TripRecord`, `StudyArea`                   |
//! | [`loader`]   | `load_legs`, `load_trips`, `load_study_area` (+ readers) |
//! | [`source`]   | `open_export` (plain or gzip), `ReadOptions`, `Loaded<T>`|
//! | [`progress`] | `LogProgress`, the logarithmic progress counter          |
//! | [`error`]    | `RecordError`, `RecordResult<T>`                         |
//!
//! # Error policy
//!
//! A row that cannot be parsed (bad duration, non-numeric coordinate) is
//! skipped, logged at `warn`, and counted in [`Loaded::skipped`].  A missing
//! file, an unreadable stream, or a missing required column is fatal.

pub mod error;
pub mod loader;
pub mod progress;
pub mod record;
pub mod source;


pub use error::{RecordError, RecordResult};
pub use loader::{
    load_legs, load_legs_reader, load_study_area, load_study_area_reader, load_trips,
    load_trips_reader,
};
pub use progress::LogProgress;
pub use record::{LegRecord, StudyArea, TripRecord, WalkAccessIndex};
pub use source::{open_export, Loaded, ReadOptions};
