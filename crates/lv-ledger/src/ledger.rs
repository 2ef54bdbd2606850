//! The per-agent liveability ledger.

use std::collections::{BTreeMap, HashMap};

use lv_core::AgentId;
use lv_records::StudyArea;

use crate::cell::Cell;
use crate::table::Table;
use crate::{LedgerError, LedgerResult};

/// Header of the agent id column, always first.
pub const PERSON_COLUMN: &str = "person";

/// File / table name the ledger is persisted under.
pub const LEDGER_TABLE: &str = "overall_stats_agentLiveabilityInfo";

/// One row per study-area agent, one column per attribute.
///
/// Rows are fixed when the ledger is created; indicator modules only ever
/// append columns.  Row order is the study area's agent order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ledger {
    /// Attribute columns after `person`.
    columns: Vec<String>,
    agents:  Vec<AgentId>,
    index:   HashMap<AgentId, usize>,
    /// `cells[row][col]`, `col` indexing `columns`.
    cells:   Vec<Vec<Cell>>,
}

impl Ledger {
    /// An empty ledger with no rows and only the `person` column.
    pub fn new() -> Self {
        Self::default()
    }

    /// The initial ledger: `person, home_x, home_y` for every study-area
    /// agent.
    pub fn from_study_area(area: &StudyArea) -> Self {
        let mut ledger = Self {
            columns: vec!["home_x".to_owned(), "home_y".to_owned()],
            ..Self::default()
        };
        for (agent, home) in area.iter() {
            ledger.push_row(agent.clone(), vec![Cell::from(home.x), Cell::from(home.y)]);
        }
        log::info!("ledger initialised with {} agents", ledger.len());
        ledger
    }

    /// Build an empty ledger from a full header (`person` first).
    pub(crate) fn with_header(header: &[String]) -> LedgerResult<Self> {
        match header.first() {
            Some(first) if first == PERSON_COLUMN => {}
            Some(other) => return Err(LedgerError::BadHeader(other.clone())),
            None => return Err(LedgerError::BadHeader(String::new())),
        }
        let mut ledger = Self::new();
        for name in &header[1..] {
            if ledger.has_column(name) {
                return Err(LedgerError::DuplicateColumn(name.clone()));
            }
            ledger.columns.push(name.clone());
        }
        Ok(ledger)
    }

    /// Append a row.  `cells` is padded or truncated to the column count.
    /// A repeated agent keeps its first row.
    pub(crate) fn push_row(&mut self, agent: AgentId, mut cells: Vec<Cell>) -> bool {
        if self.index.contains_key(&agent) {
            return false;
        }
        cells.resize(self.columns.len(), Cell::Empty);
        self.index.insert(agent.clone(), self.agents.len());
        self.agents.push(agent);
        self.cells.push(cells);
        true
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Attribute columns, without `person`.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Full header, `person` first.
    pub fn header(&self) -> impl Iterator<Item = &str> {
        std::iter::once(PERSON_COLUMN).chain(self.columns.iter().map(String::as_str))
    }

    pub fn has_column(&self, name: &str) -> bool {
        name == PERSON_COLUMN || self.columns.iter().any(|c| c == name)
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    pub fn contains_agent(&self, agent: &AgentId) -> bool {
        self.index.contains_key(agent)
    }

    pub fn get(&self, agent: &AgentId, column: &str) -> Option<&Cell> {
        let row = *self.index.get(agent)?;
        let col = self.column_index(column)?;
        self.cells[row].get(col)
    }

    /// Rows in ledger order.
    pub fn rows(&self) -> impl Iterator<Item = (&AgentId, &[Cell])> {
        self.agents.iter().zip(self.cells.iter().map(Vec::as_slice))
    }

    /// `(agent, cell)` for one column, or `None` if there is no such column.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = (&AgentId, &Cell)>> {
        let col = self.column_index(name)?;
        Some(self.agents.iter().zip(self.cells.iter().map(move |r| &r[col])))
    }

    /// Names of the columns starting with `prefix`, in column order.
    pub fn columns_with_prefix<'s>(&'s self, prefix: &'s str) -> impl Iterator<Item = &'s str> {
        self.columns.iter().map(String::as_str).filter(move |c| c.starts_with(prefix))
    }

    // ── Extension ─────────────────────────────────────────────────────────

    /// Add exactly one column filled from `mapping`.
    ///
    /// Agents missing from `mapping` get an empty cell; mapping entries for
    /// agents not in the ledger are ignored.  Rows and their order do not
    /// change.  Fails if `column` already exists.
    pub fn extend_with_attribute<T>(&mut self, mapping: &BTreeMap<AgentId, T>, column: &str) -> LedgerResult<()>
    where
        T: Clone + Into<Cell>,
    {
        let ignored = mapping.keys().filter(|a| !self.contains_agent(a)).count();
        if ignored > 0 {
            log::debug!("`{column}`: {ignored} values for agents outside the ledger ignored");
        }
        self.extend_with(column, |agent| mapping.get(agent).cloned().map_or(Cell::Empty, Into::into))
    }

    /// Add one column whose cell for each agent is `f(agent)`.
    pub fn extend_with<F>(&mut self, column: &str, mut f: F) -> LedgerResult<()>
    where
        F: FnMut(&AgentId) -> Cell,
    {
        if self.has_column(column) {
            return Err(LedgerError::DuplicateColumn(column.to_owned()));
        }
        for (agent, row) in self.agents.iter().zip(self.cells.iter_mut()) {
            row.push(f(agent));
        }
        self.columns.push(column.to_owned());
        Ok(())
    }

    /// The ledger as a plain table, `person` first.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(LEDGER_TABLE, self.header());
        for (agent, cells) in self.rows() {
            let mut row = Vec::with_capacity(cells.len() + 1);
            row.push(Cell::Text(agent.as_str().to_owned()));
            row.extend(cells.iter().cloned());
            table.push_unchecked(row);
        }
        table
    }
}
