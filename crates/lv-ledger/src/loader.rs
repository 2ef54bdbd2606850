//! Reload a CSV ledger.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use lv_core::AgentId;

use crate::cell::Cell;
use crate::ledger::Ledger;
use crate::LedgerResult;

/// Load a ledger written by [`CsvLedgerWriter`](crate::CsvLedgerWriter).
pub fn load_ledger_csv(path: &Path) -> LedgerResult<Ledger> {
    load_ledger_reader(File::open(path)?)
}

/// Like [`load_ledger_csv`] but reads from any `Read` source.
///
/// The header must start with `person`.  Cells are read back with
/// [`Cell::parse`], so text that looks like a number reloads as a number.
pub fn load_ledger_reader<R: Read>(reader: R) -> LedgerResult<Ledger> {
    let mut rdr = csv::Reader::from_reader(reader);
    let header: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
    let mut ledger = Ledger::with_header(&header)?;

    for record in rdr.records() {
        let record = record?;
        let mut fields = record.iter();
        let Some(person) = fields.next() else { continue };
        let cells = fields.map(Cell::parse).collect();
        if !ledger.push_row(AgentId::from(person), cells) {
            log::warn!("ledger: duplicate row for agent `{person}` ignored");
        }
    }
    Ok(ledger)
}
