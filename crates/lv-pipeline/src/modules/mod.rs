//! The standard indicator modules.
//!
//! | Module                 | Ledger columns                                            | Summary tile              |
//! |------------------------|-----------------------------------------------------------|---------------------------|
//! | [`TrafficQuality`]     | longest trip, relative loss, `indexValue_trafficQuality`  | "Travel Time Index Value" |
//! | [`PtQuality`]          | `indexValue_ptCarRatio`, `_walkAccess`, `_ptQuality`      | "PtQuality"               |
//! | [`LossTime`]           | none                                                      | "Loss Time Ranking"       |
//! | [`LiveabilitySummary`] | none                                                      | "Overall Ranking"         |

mod loss_time;
mod pt_quality;
mod summary;
mod traffic_quality;

pub use loss_time::LossTime;
pub use pt_quality::PtQuality;
pub use summary::{LiveabilitySummary, INDEX_PREFIX};
pub use traffic_quality::TrafficQuality;

use std::collections::BTreeMap;

use lv_core::time::day_intervals;
use lv_indicators::{format_percent, RankingSummary};
use lv_ledger::{Cell, Table};

use crate::PipelineResult;

/// Written instead of a percentage when a ranking counted nobody.
pub const NO_RANKING: &str = "n/a";

/// The ranking value as written to tiles and the indicator catalogue.
fn ranking_value(summary: &RankingSummary) -> String {
    if summary.counted == 0 {
        return NO_RANKING.to_owned();
    }
    format_percent(summary.within_pct())
}

/// `{category, value}` table for module-local headline figures.
fn tile_table(name: &str, tiles: &[(&str, String)]) -> PipelineResult<Table> {
    let mut table = Table::new(name, ["category", "value"]);
    for (category, value) in tiles {
        table.push_row(vec![Cell::from(*category), Cell::from(value.as_str())])?;
    }
    Ok(table)
}

/// Histogram over every departure interval of the day, empty buckets
/// included.
fn interval_table(
    name:          &str,
    value_column:  &str,
    values:        &BTreeMap<String, f64>,
    interval_mins: u32,
) -> PipelineResult<Table> {
    let mut table = Table::new(name, ["timeInterval", value_column]);
    for label in day_intervals(interval_mins) {
        let v = values.get(&label).copied().unwrap_or(0.0);
        table.push_row(vec![Cell::Text(label), Cell::from(v)])?;
    }
    Ok(table)
}
