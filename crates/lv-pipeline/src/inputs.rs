//! Simulation exports one run reads.

use std::fs;
use std::path::{Path, PathBuf};

use lv_core::LiveabilityConfig;
use lv_records::{
    load_legs, load_study_area, load_trips, LegRecord, ReadOptions, StudyArea, TripRecord, WalkAccessIndex,
};

use crate::{PipelineError, PipelineResult};

/// Locations of the three exports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputPaths {
    pub legs:       PathBuf,
    pub trips:      PathBuf,
    pub study_area: PathBuf,
}

impl InputPaths {
    /// Find `*output_legs.csv[.gz]` and `*output_trips.csv[.gz]` in a run's
    /// output directory.  Simulation runs prefix these with their run id.
    pub fn in_run_dir(run_dir: &Path, study_area: &Path) -> PipelineResult<Self> {
        Ok(Self {
            legs:       find_export(run_dir, "output_legs")?,
            trips:      find_export(run_dir, "output_trips")?,
            study_area: study_area.to_path_buf(),
        })
    }
}

fn find_export(dir: &Path, stem: &'static str) -> PipelineResult<PathBuf> {
    let plain = format!("{stem}.csv");
    let gz = format!("{stem}.csv.gz");
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(lv_records::RecordError::from)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(&gz) || n.ends_with(&plain))
        })
        .collect();
    // gzip first, then the shortest name.
    found.sort_by_key(|p| (p.extension().is_none_or(|e| e != "gz"), p.as_os_str().len()));
    match found.into_iter().next() {
        Some(p) => Ok(p),
        None => Err(PipelineError::MissingInput { what: stem, dir: dir.to_path_buf() }),
    }
}

/// Rows skipped while loading, per export.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SkippedRows {
    pub legs:       usize,
    pub trips:      usize,
    pub study_area: usize,
}

/// Everything the indicator modules read.
#[derive(Clone, Debug, Default)]
pub struct RunInputs {
    pub legs:    Vec<LegRecord>,
    pub trips:   Vec<TripRecord>,
    pub area:    StudyArea,
    /// Longest walk leg per trip, built once from `legs`.
    pub walks:   WalkAccessIndex,
    pub skipped: SkippedRows,
}

impl RunInputs {
    pub fn new(legs: Vec<LegRecord>, trips: Vec<TripRecord>, area: StudyArea) -> Self {
        let walks = WalkAccessIndex::from_legs(&legs);
        Self { legs, trips, area, walks, skipped: SkippedRows::default() }
    }

    /// Load all three exports.  Any I/O failure aborts; bad rows are
    /// skipped and counted in [`skipped`](Self::skipped).
    pub fn load(paths: &InputPaths, config: &LiveabilityConfig) -> PipelineResult<Self> {
        let opts = ReadOptions::with_delimiter(config.delimiter_byte()?);

        let area = load_study_area(&paths.study_area)?;
        let legs = load_legs(&paths.legs, &opts)?;
        let trips = load_trips(&paths.trips, &opts)?;

        let mut inputs = Self::new(legs.records, trips.records, area.records);
        inputs.skipped = SkippedRows { legs: legs.skipped, trips: trips.skipped, study_area: area.skipped };
        log::info!(
            "inputs: {} study-area agents, {} legs, {} trips ({} walk-indexed trips)",
            inputs.area.len(),
            inputs.legs.len(),
            inputs.trips.len(),
            inputs.walks.len()
        );
        Ok(inputs)
    }
}
