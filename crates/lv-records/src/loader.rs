//! CSV loaders for legs, trips, and the study-area agent list.
//!
//! # Formats
//!
//! Leg and trip exports are `;`-separated by default (see [`ReadOptions`]),
//! optionally gzip-compressed.  Durations and times are `HH:MM:SS`.  Extra
//! columns are ignored.
//!
//! ```csv
//! person;trip_id;mode;dep_time;trav_time;start_x;start_y;start_link;end_x;end_y;end_link;distance
//! p1;p1_1;walk;08:00:00;00:05:00;0;0;l1;300;0;l2;320
//! ```
//!
//! ```csv
//! person;trip_id;main_mode;dep_time;trav_time;euclidean_distance;start_x;start_y;start_link;end_x;end_y;end_link
//! p1;p1_1;car;08:00:00;00:25:00;4000;0;0;l1;4000;0;l9
//! ```
//!
//! The study-area list is comma-separated: `person,home_x,home_y`.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use lv_core::time::parse_hms;
use lv_core::{AgentId, Coord};

use crate::progress::LogProgress;
use crate::record::{LegRecord, StudyArea, TripRecord};
use crate::source::{open_export, Loaded, ReadOptions};
use crate::{RecordError, RecordResult};

/// Individual skipped rows are logged up to this many per file; the total
/// is always logged.
const SKIP_LOG_LIMIT: usize = 5;

// ── Raw CSV rows ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawLeg {
    person:     String,
    trip_id:    String,
    mode:       String,
    trav_time:  String,
    dep_time:   String,
    start_x:    String,
    start_y:    String,
    start_link: String,
    end_x:      String,
    end_y:      String,
    end_link:   String,
    #[serde(default)]
    distance:   Option<String>,
}

#[derive(Deserialize)]
struct RawTrip {
    person:             String,
    trip_id:            String,
    main_mode:          String,
    trav_time:          String,
    dep_time:           String,
    euclidean_distance: String,
    start_x:            String,
    start_y:            String,
    start_link:         String,
    end_x:              String,
    end_y:              String,
    end_link:           String,
}

#[derive(Deserialize)]
struct RawHome {
    person: String,
    home_x: String,
    home_y: String,
}

const LEG_COLUMNS: &[&str] = &[
    "person", "trip_id", "mode", "trav_time", "dep_time", "start_x", "start_y", "start_link",
    "end_x", "end_y", "end_link",
];

const TRIP_COLUMNS: &[&str] = &[
    "person", "trip_id", "main_mode", "trav_time", "dep_time", "euclidean_distance", "start_x",
    "start_y", "start_link", "end_x", "end_y", "end_link",
];

const HOME_COLUMNS: &[&str] = &["person", "home_x", "home_y"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the leg export at `path` (plain or `.gz`).
pub fn load_legs(path: &Path, opts: &ReadOptions) -> RecordResult<Loaded<Vec<LegRecord>>> {
    let loaded = load_legs_reader(open_export(path)?, opts)?;
    log::info!("read {} legs from {} ({} skipped)", loaded.records.len(), path.display(), loaded.skipped);
    Ok(loaded)
}

/// Like [`load_legs`] but accepts any `Read` source.
pub fn load_legs_reader<R: Read>(reader: R, opts: &ReadOptions) -> RecordResult<Loaded<Vec<LegRecord>>> {
    read_rows("leg", reader, opts.delimiter, LEG_COLUMNS, leg_from_raw)
}

/// Load the trip export at `path` (plain or `.gz`).
pub fn load_trips(path: &Path, opts: &ReadOptions) -> RecordResult<Loaded<Vec<TripRecord>>> {
    let loaded = load_trips_reader(open_export(path)?, opts)?;
    log::info!("read {} trips from {} ({} skipped)", loaded.records.len(), path.display(), loaded.skipped);
    Ok(loaded)
}

/// Like [`load_trips`] but accepts any `Read` source.
pub fn load_trips_reader<R: Read>(reader: R, opts: &ReadOptions) -> RecordResult<Loaded<Vec<TripRecord>>> {
    read_rows("trip", reader, opts.delimiter, TRIP_COLUMNS, trip_from_raw)
}

/// Load the study-area agent list (`person,home_x,home_y`).
pub fn load_study_area(path: &Path) -> RecordResult<Loaded<StudyArea>> {
    let loaded = load_study_area_reader(open_export(path)?)?;
    log::info!(
        "study area holds {} agents ({} rows skipped)",
        loaded.records.len(),
        loaded.skipped
    );
    Ok(loaded)
}

/// Like [`load_study_area`] but accepts any `Read` source.
pub fn load_study_area_reader<R: Read>(reader: R) -> RecordResult<Loaded<StudyArea>> {
    let rows = read_rows("study-area", reader, b',', HOME_COLUMNS, home_from_raw)?;
    let mut area = StudyArea::new();
    let mut skipped = rows.skipped;
    for (agent, home) in rows.records {
        if !area.insert(agent.clone(), home) {
            log::warn!("study area lists agent {agent} twice; keeping the first home");
            skipped += 1;
        }
    }
    Ok(Loaded { records: area, skipped })
}

// ── Internals ─────────────────────────────────────────────────────────────────

fn read_rows<R, Raw, T>(
    what:      &'static str,
    reader:    R,
    delimiter: u8,
    required:  &'static [&'static str],
    convert:   fn(Raw) -> Result<T, String>,
) -> RecordResult<Loaded<Vec<T>>>
where
    R: Read,
    Raw: for<'de> Deserialize<'de>,
{
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for &column in required {
        if !headers.iter().any(|h| h == column) {
            return Err(RecordError::MissingColumn { what, column });
        }
    }

    let mut records  = Vec::new();
    let mut skipped  = 0usize;
    let mut progress = LogProgress::new(what);

    for (i, result) in rdr.deserialize::<Raw>().enumerate() {
        progress.tick();
        let parsed = match result {
            Ok(raw) => convert(raw),
            // A broken stream is fatal; a malformed row is not.
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => Err(e.to_string()),
        };
        match parsed {
            Ok(rec) => records.push(rec),
            Err(msg) => {
                skipped += 1;
                if skipped <= SKIP_LOG_LIMIT {
                    // +2: header line and 1-based numbering.
                    log::warn!("skipping {what} row {}: {msg}", i + 2);
                }
            }
        }
    }
    if skipped > SKIP_LOG_LIMIT {
        log::warn!("skipped {skipped} {what} rows in total");
    }

    Ok(Loaded { records, skipped })
}

fn number(field: &str, value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("`{field}` is not a number: `{value}`"))
}

fn duration(field: &str, value: &str) -> Result<u64, String> {
    parse_hms(value).map_err(|e| format!("`{field}`: {e}"))
}

fn coord(fx: &str, x: &str, fy: &str, y: &str) -> Result<Coord, String> {
    Ok(Coord::new(number(fx, x)?, number(fy, y)?))
}

fn leg_from_raw(r: RawLeg) -> Result<LegRecord, String> {
    if r.person.is_empty() {
        return Err("empty `person`".into());
    }
    let distance_m = match r.distance.as_deref() {
        None | Some("") => None,
        Some(d) => Some(number("distance", d)?),
    };
    Ok(LegRecord {
        trav_time_secs: duration("trav_time", &r.trav_time)?,
        dep_time_secs:  duration("dep_time", &r.dep_time)?,
        start:          coord("start_x", &r.start_x, "start_y", &r.start_y)?,
        end:            coord("end_x", &r.end_x, "end_y", &r.end_y)?,
        agent:          AgentId(r.person),
        trip_id:        r.trip_id,
        mode:           r.mode,
        start_link:     r.start_link,
        end_link:       r.end_link,
        distance_m,
    })
}

fn trip_from_raw(r: RawTrip) -> Result<TripRecord, String> {
    if r.person.is_empty() {
        return Err("empty `person`".into());
    }
    Ok(TripRecord {
        trav_time_secs:       duration("trav_time", &r.trav_time)?,
        dep_time_secs:        duration("dep_time", &r.dep_time)?,
        euclidean_distance_m: number("euclidean_distance", &r.euclidean_distance)?,
        start:                coord("start_x", &r.start_x, "start_y", &r.start_y)?,
        end:                  coord("end_x", &r.end_x, "end_y", &r.end_y)?,
        agent:                AgentId(r.person),
        trip_id:              r.trip_id,
        main_mode:            r.main_mode,
        start_link:           r.start_link,
        end_link:             r.end_link,
    })
}

fn home_from_raw(r: RawHome) -> Result<(AgentId, Coord), String> {
    if r.person.is_empty() {
        return Err("empty `person`".into());
    }
    let home = coord("home_x", &r.home_x, "home_y", &r.home_y)?;
    Ok((AgentId(r.person), home))
}
