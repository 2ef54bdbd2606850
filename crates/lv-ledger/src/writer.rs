//! The `LedgerWriter` trait implemented by all backend writers.

use crate::catalogue::IndicatorCatalogue;
use crate::ledger::Ledger;
use crate::table::{Table, XytMap};
use crate::tiles::SummaryTiles;
use crate::LedgerResult;

/// Trait implemented by the CSV, SQLite, and Parquet writers.
///
/// Each call writes one complete table.  Only [`write_table`] is required;
/// the other methods default to writing their typed table view and are
/// overridden where a backend has a dedicated layout.
///
/// [`write_table`]: LedgerWriter::write_table
pub trait LedgerWriter {
    fn write_table(&mut self, table: &Table) -> LedgerResult<()>;

    fn write_ledger(&mut self, ledger: &Ledger) -> LedgerResult<()> {
        self.write_table(&ledger.to_table())
    }

    fn write_tiles(&mut self, tiles: &SummaryTiles) -> LedgerResult<()> {
        self.write_table(&tiles.to_table())
    }

    fn write_indicators(&mut self, catalogue: &IndicatorCatalogue) -> LedgerResult<()> {
        self.write_table(&catalogue.to_table())
    }

    fn write_xyt_map(&mut self, map: &XytMap) -> LedgerResult<()> {
        self.write_table(&map.to_table())
    }

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> LedgerResult<()>;
}
