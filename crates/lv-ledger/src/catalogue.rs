//! The indicator catalogue: one row per computed indicator.

use crate::cell::Cell;
use crate::table::Table;

pub const INDICATOR_HEADER: [&str; 6] = ["dimension", "indicator", "median value", "limit", "ranking value", "weight"];

/// File / table name the catalogue is persisted under.
pub const INDICATOR_TABLE: &str = "overall_stats_indicatorValues";

#[derive(Clone, Debug, PartialEq)]
pub struct IndicatorRecord {
    pub dimension: String,
    pub indicator: String,
    /// Median of the underlying measurement; `None` when no agent had one.
    pub median:    Option<f64>,
    /// Human-readable limit, e.g. `"30 min"` or `"0.2"`.
    pub limit:     String,
    /// Formatted ranking value, e.g. `"70.00%"`.
    pub ranking:   String,
    pub weight:    f64,
}

impl IndicatorRecord {
    /// Cells in [`INDICATOR_HEADER`] order.  The median is written with two
    /// decimals.
    pub fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.dimension.as_str()),
            Cell::from(self.indicator.as_str()),
            self.median.map_or(Cell::Empty, |m| Cell::Text(format!("{m:.2}"))),
            Cell::from(self.limit.as_str()),
            Cell::from(self.ranking.as_str()),
            Cell::from(self.weight),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndicatorCatalogue {
    records: Vec<IndicatorRecord>,
}

impl IndicatorCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend_indicator_record(
        &mut self,
        dimension: impl Into<String>,
        indicator: impl Into<String>,
        median:    Option<f64>,
        limit:     impl Into<String>,
        ranking:   impl Into<String>,
        weight:    f64,
    ) {
        self.records.push(IndicatorRecord {
            dimension: dimension.into(),
            indicator: indicator.into(),
            median:    median.filter(|m| m.is_finite()),
            limit:     limit.into(),
            ranking:   ranking.into(),
            weight,
        });
    }

    pub fn records(&self) -> &[IndicatorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new(INDICATOR_TABLE, INDICATOR_HEADER);
        for r in &self.records {
            table.push_unchecked(r.cells());
        }
        table
    }
}
