//! Auxiliary tables and per-agent map layers.

use std::collections::BTreeMap;

use lv_core::AgentId;
use lv_records::StudyArea;

use crate::cell::{Cell, ColumnKind};
use crate::{LedgerError, LedgerResult};

// ── Table ─────────────────────────────────────────────────────────────────────

/// A named rectangular table, persisted as one file or SQL table.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub name:   String,
    pub header: Vec<String>,
    pub rows:   Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(name: impl Into<String>, header: impl IntoIterator<Item = S>) -> Self {
        Self {
            name:   name.into(),
            header: header.into_iter().map(Into::into).collect(),
            rows:   Vec::new(),
        }
    }

    /// Append a row; it must have one cell per header column.
    pub fn push_row(&mut self, row: Vec<Cell>) -> LedgerResult<()> {
        if row.len() != self.header.len() {
            return Err(LedgerError::RowWidth {
                table:    self.name.clone(),
                expected: self.header.len(),
                got:      row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub(crate) fn push_unchecked(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.header.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Storage kind of every column.
    pub fn column_kinds(&self) -> Vec<ColumnKind> {
        (0..self.header.len())
            .map(|c| ColumnKind::infer(self.rows.iter().map(|r| &r[c])))
            .collect()
    }
}

// ── XytMap ────────────────────────────────────────────────────────────────────

/// Per-agent values placed at the agents' home coordinates.
///
/// All points carry time `0.0`; map viewers treat the layer as static.
#[derive(Clone, Debug, PartialEq)]
pub struct XytMap {
    pub name:   String,
    /// Coordinate reference system label, e.g. `"EPSG:25832"`.
    pub crs:    String,
    /// `(x, y, value)`.
    pub points: Vec<(f64, f64, f64)>,
}

impl XytMap {
    /// One point per agent of `values` with a known home.  Agents without a
    /// home and non-finite values are left out.
    pub fn from_values(
        name:   impl Into<String>,
        crs:    impl Into<String>,
        values: &BTreeMap<AgentId, f64>,
        area:   &StudyArea,
    ) -> Self {
        let points = values
            .iter()
            .filter(|(_, v)| v.is_finite())
            .filter_map(|(agent, &v)| area.home(agent).map(|h| (h.x, h.y, v)))
            .collect();
        Self { name: name.into(), crs: crs.into(), points }
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new(self.name.clone(), ["time", "x", "y", "value"]);
        for &(x, y, v) in &self.points {
            table.push_unchecked(vec![Cell::Number(0.0), Cell::from(x), Cell::from(y), Cell::from(v)]);
        }
        table
    }
}
