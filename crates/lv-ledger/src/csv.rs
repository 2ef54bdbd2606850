//! CSV output backend.
//!
//! Every table becomes `<name>.csv` in the output directory, comma
//! separated.  Summary tiles have no header row, and a fresh tile set is
//! written as the single placeholder line.  Map layers become
//! `<name>.xyt.csv` with a leading `# <crs>` comment line.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};

use crate::table::{Table, XytMap};
use crate::tiles::{SummaryTiles, TILES_TABLE};
use crate::writer::LedgerWriter;
use crate::LedgerResult;

/// Writes each table to its own CSV file.
pub struct CsvLedgerWriter {
    dir:      PathBuf,
    written:  Vec<PathBuf>,
    finished: bool,
}

impl CsvLedgerWriter {
    /// Create `dir` if needed.
    pub fn new(dir: &Path) -> LedgerResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf(), written: Vec::new(), finished: false })
    }

    /// Files written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn open(&mut self, file_name: String) -> LedgerResult<Writer<File>> {
        let path = self.dir.join(file_name);
        let writer = WriterBuilder::new().flexible(true).from_path(&path)?;
        self.written.push(path);
        Ok(writer)
    }
}

impl LedgerWriter for CsvLedgerWriter {
    fn write_table(&mut self, table: &Table) -> LedgerResult<()> {
        let mut w = self.open(format!("{}.csv", table.name))?;
        w.write_record(&table.header)?;
        for row in &table.rows {
            w.write_record(row.iter().map(|c| c.to_string()))?;
        }
        w.flush()?;
        Ok(())
    }

    fn write_tiles(&mut self, tiles: &SummaryTiles) -> LedgerResult<()> {
        let mut w = self.open(format!("{TILES_TABLE}.csv"))?;
        for line in tiles.lines() {
            w.write_record(line)?;
        }
        w.flush()?;
        Ok(())
    }

    fn write_xyt_map(&mut self, map: &XytMap) -> LedgerResult<()> {
        let mut w = self.open(format!("{}.xyt.csv", map.name))?;
        w.write_record([format!("# {}", map.crs)])?;
        let table = map.to_table();
        w.write_record(&table.header)?;
        for row in &table.rows {
            w.write_record(row.iter().map(|c| c.to_string()))?;
        }
        w.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> LedgerResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        log::info!("{} CSV files written to {}", self.written.len(), self.dir.display());
        Ok(())
    }
}
