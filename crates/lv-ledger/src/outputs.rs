//! Everything one run persists.

use crate::catalogue::IndicatorCatalogue;
use crate::ledger::Ledger;
use crate::table::{Table, XytMap};
use crate::tiles::SummaryTiles;
use crate::writer::LedgerWriter;
use crate::LedgerResult;

/// The in-memory outputs of one indicator run.
///
/// Modules extend these as they run; [`persist`](Self::persist) writes them
/// once at the end.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunOutputs {
    pub ledger:     Ledger,
    pub tiles:      SummaryTiles,
    pub indicators: IndicatorCatalogue,
    pub tables:     Vec<Table>,
    pub maps:       Vec<XytMap>,
}

impl RunOutputs {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger, ..Self::default() }
    }

    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    pub fn add_map(&mut self, map: XytMap) {
        self.maps.push(map);
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Write everything through `writer` and finish it.
    pub fn persist(&self, writer: &mut dyn LedgerWriter) -> LedgerResult<()> {
        writer.write_ledger(&self.ledger)?;
        writer.write_tiles(&self.tiles)?;
        writer.write_indicators(&self.indicators)?;
        for table in &self.tables {
            writer.write_table(table)?;
        }
        for map in &self.maps {
            writer.write_xyt_map(map)?;
        }
        writer.finish()
    }
}
