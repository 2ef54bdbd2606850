//! Parquet output backend (feature `parquet`).
//!
//! Every table becomes `<name>.parquet` in the output directory.  Columns
//! holding only numbers are nullable `Float64`, everything else nullable
//! `Utf8`.  Map layers are written as plain `time, x, y, value` tables.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::cell::{Cell, ColumnKind};
use crate::table::Table;
use crate::writer::LedgerWriter;
use crate::LedgerResult;

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

fn schema_of(table: &Table, kinds: &[ColumnKind]) -> Arc<Schema> {
    let fields: Vec<Field> = table
        .header
        .iter()
        .zip(kinds)
        .map(|(name, kind)| {
            let ty = match kind {
                ColumnKind::Numeric => DataType::Float64,
                ColumnKind::Text => DataType::Utf8,
            };
            Field::new(name, ty, true)
        })
        .collect();
    Arc::new(Schema::new(fields))
}

fn column_array(table: &Table, col: usize, kind: ColumnKind) -> ArrayRef {
    match kind {
        ColumnKind::Numeric => {
            let mut b = Float64Builder::with_capacity(table.rows.len());
            for row in &table.rows {
                b.append_option(row[col].as_f64());
            }
            Arc::new(b.finish())
        }
        ColumnKind::Text => {
            let mut b = StringBuilder::new();
            for row in &table.rows {
                match &row[col] {
                    Cell::Empty => b.append_null(),
                    cell => b.append_value(cell.to_string()),
                }
            }
            Arc::new(b.finish())
        }
    }
}

/// Writes each table to its own Parquet file.
///
/// Each file is complete, footer included, once its `write_*` call returns.
pub struct ParquetLedgerWriter {
    dir:      PathBuf,
    written:  Vec<PathBuf>,
    finished: bool,
}

impl ParquetLedgerWriter {
    pub fn new(dir: &Path) -> LedgerResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf(), written: Vec::new(), finished: false })
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl LedgerWriter for ParquetLedgerWriter {
    fn write_table(&mut self, table: &Table) -> LedgerResult<()> {
        let kinds = table.column_kinds();
        let schema = schema_of(table, &kinds);
        let columns: Vec<ArrayRef> = kinds
            .iter()
            .enumerate()
            .map(|(col, &kind)| column_array(table, col, kind))
            .collect();

        let path = self.dir.join(format!("{}.parquet", table.name));
        let mut writer = ArrowWriter::try_new(File::create(&path)?, Arc::clone(&schema), Some(snappy_props()))?;
        if !table.rows.is_empty() {
            let batch = RecordBatch::try_new(schema, columns)?;
            writer.write(&batch)?;
        }
        writer.close()?;
        self.written.push(path);
        Ok(())
    }

    fn finish(&mut self) -> LedgerResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        log::info!("{} Parquet files written to {}", self.written.len(), self.dir.display());
        Ok(())
    }
}
