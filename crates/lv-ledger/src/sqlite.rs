//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `liveability.db` in the output directory with one SQL
//! table per written table.  Columns holding only numbers are `REAL`,
//! everything else `TEXT`; empty cells are `NULL`.  Writing a table that
//! already exists replaces it.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::Connection;

use crate::cell::{Cell, ColumnKind};
use crate::table::Table;
use crate::writer::LedgerWriter;
use crate::LedgerResult;

/// Database file name inside the output directory.
pub const DB_FILE: &str = "liveability.db";

/// Writes ledger tables to an SQLite database.
pub struct SqliteLedgerWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteLedgerWriter {
    /// Open (or create) `liveability.db` in `dir`.
    pub fn new(dir: &Path) -> LedgerResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join(DB_FILE))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;",
        )?;
        Ok(Self { conn, finished: false })
    }
}

/// Double-quoted SQL identifier.
fn ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_value(cell: &Cell) -> Value {
    match cell {
        Cell::Empty => Value::Null,
        Cell::Number(v) => Value::Real(*v),
        Cell::Text(s) => Value::Text(s.clone()),
    }
}

impl LedgerWriter for SqliteLedgerWriter {
    fn write_table(&mut self, table: &Table) -> LedgerResult<()> {
        let columns: Vec<String> = table
            .header
            .iter()
            .zip(table.column_kinds())
            .map(|(name, kind)| {
                let ty = match kind {
                    ColumnKind::Numeric => "REAL",
                    ColumnKind::Text => "TEXT",
                };
                format!("{} {ty}", ident(name))
            })
            .collect();
        let name = ident(&table.name);

        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {name};
             CREATE TABLE {name} ({});",
            columns.join(", ")
        ))?;
        if !table.rows.is_empty() {
            let placeholders: Vec<String> = (1..=table.header.len()).map(|i| format!("?{i}")).collect();
            let mut stmt = tx.prepare_cached(&format!(
                "INSERT INTO {name} VALUES ({})",
                placeholders.join(", ")
            ))?;
            for row in &table.rows {
                stmt.execute(rusqlite::params_from_iter(row.iter().map(sql_value)))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> LedgerResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
