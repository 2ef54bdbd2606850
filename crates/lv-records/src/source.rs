//! Opening export files and shared read options.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::{RecordError, RecordResult};

/// Open `path` for reading, decompressing transparently when it ends in `.gz`.
pub fn open_export(path: &Path) -> RecordResult<Box<dyn Read>> {
    let f = File::open(path).map_err(|source| RecordError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let is_gzip = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    let r: Box<dyn Read> = if is_gzip {
        Box::new(BufReader::new(GzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };
    Ok(r)
}

/// CSV dialect of an export.
#[derive(Copy, Clone, Debug)]
pub struct ReadOptions {
    pub delimiter: u8,
}

impl ReadOptions {
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for ReadOptions {
    /// Simulation exports are `;`-separated.
    fn default() -> Self {
        Self { delimiter: b';' }
    }
}

/// Parsed records plus the number of rows skipped as unparseable.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: T,
    pub skipped: usize,
}
