//! Headline summary tiles.

use crate::cell::Cell;
use crate::table::Table;

/// Single line a tiles file holds before any tile is added.
pub const PLACEHOLDER: &str = "Theres nothing here to see :( - CSV created but no content added";

/// File / table name the tiles are persisted under.
pub const TILES_TABLE: &str = "overall_tiles_indexDimensionValues";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryTile {
    pub category: String,
    pub value:    String,
}

/// `{category, value}` rows, in the order they were added.
///
/// A fresh set holds only the [`PLACEHOLDER`]; the first tile replaces it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SummaryTiles {
    tiles: Vec<SummaryTile>,
}

impl SummaryTiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend_summary_tile(&mut self, category: impl Into<String>, value: impl Into<String>) {
        self.tiles.push(SummaryTile { category: category.into(), value: value.into() });
    }

    /// `true` until the first tile is added.
    pub fn is_placeholder(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[SummaryTile] {
        &self.tiles
    }

    pub fn get(&self, category: &str) -> Option<&str> {
        self.tiles.iter().find(|t| t.category == category).map(|t| t.value.as_str())
    }

    /// Text lines as written to a file: the placeholder alone, or one
    /// `[category, value]` per tile.
    pub fn lines(&self) -> Vec<Vec<&str>> {
        if self.is_placeholder() {
            vec![vec![PLACEHOLDER]]
        } else {
            self.tiles.iter().map(|t| vec![t.category.as_str(), t.value.as_str()]).collect()
        }
    }

    /// Typed view for the table backends; the placeholder has no rows.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(TILES_TABLE, ["category", "value"]);
        for t in &self.tiles {
            table.push_unchecked(vec![Cell::from(t.category.as_str()), Cell::from(t.value.as_str())]);
        }
        table
    }
}
