//! Loss time: per-leg delay against the free-flow baseline.

use std::collections::BTreeMap;

use lv_core::deviation;
use lv_indicators::RankingSummary;
use lv_ledger::{Cell, Table};

use super::{ranking_value, tile_table};
use crate::context::RunContext;
use crate::module::IndicatorModule;
use crate::PipelineResult;

pub const TILE: &str = "Loss Time Ranking";

/// Leg-level loss tables and the loss-time ranking.
///
/// An agent is within limit when its relative loss stays at or below
/// `limits.relative_loss_time`.  No ledger columns; the traffic quality
/// module carries the per-agent loss into the ledger.
#[derive(Debug, Default)]
pub struct LossTime;

impl IndicatorModule for LossTime {
    fn name(&self) -> &'static str {
        "loss_time"
    }

    fn run(&mut self, ctx: &mut RunContext<'_, '_>) -> PipelineResult<()> {
        let limit = ctx.config.limits.relative_loss_time;
        let report = ctx.loss_report()?;
        let out = &mut ctx.outputs;

        let mut legs = Table::new(
            "lossTime_stats_legs",
            [
                "person",
                "trip_id",
                "mode",
                "trav_time",
                "freeflow_time",
                "loss_time",
                "percent_loss_time",
                "dep_time",
                "start_x",
                "start_y",
                "end_x",
                "end_y",
                "start_link",
                "end_link",
                "baseline_source",
                "clamped",
            ],
        );
        for leg in &report.legs {
            legs.push_row(vec![
                Cell::from(leg.agent.as_str()),
                Cell::from(leg.trip_id.as_str()),
                Cell::from(leg.mode.as_str()),
                Cell::from(leg.actual_secs),
                Cell::from(leg.baseline_secs),
                Cell::from(leg.loss_secs),
                Cell::from(leg.percent_loss),
                Cell::from(leg.dep_time_secs),
                Cell::from(leg.start.x),
                Cell::from(leg.start.y),
                Cell::from(leg.end.x),
                Cell::from(leg.end.y),
                Cell::from(leg.start_link.as_str()),
                Cell::from(leg.end_link.as_str()),
                Cell::from(leg.source.map(|s| s.as_str())),
                Cell::from(leg.clamped),
            ])?;
        }
        out.add_table(legs);

        let mut per_mode = Table::new(
            "lossTime_summary_perMode",
            ["mode", "cumulative_loss_time", "legs", "clamped_legs", "failed_routings", "unsupported_legs"],
        );
        for (mode, m) in &report.per_mode {
            per_mode.push_row(vec![
                Cell::from(mode.as_str()),
                Cell::from(m.cumulative_loss_secs),
                Cell::from(m.legs),
                Cell::from(m.clamped_legs),
                Cell::from(report.tally.failed_routings(mode)),
                Cell::from(report.tally.unknown_legs(mode)),
            ])?;
        }
        out.add_table(per_mode);

        let mut deviations: BTreeMap<&str, f64> = BTreeMap::new();
        let mut per_agent = Table::new(
            "lossTime_stats_perAgent",
            ["person", "loss_time", "travel_time", "freeflow_time", "relative_loss", "deviation", "modes"],
        );
        for (agent, a) in &report.per_agent {
            let rel = a.relative_loss();
            let dev = deviation(rel, limit);
            deviations.insert(agent.as_str(), dev);
            per_agent.push_row(vec![
                Cell::from(agent.as_str()),
                Cell::from(a.loss_secs),
                Cell::from(a.travel_secs),
                Cell::from(a.baseline_secs),
                Cell::from(rel),
                Cell::from(dev),
                Cell::from(a.modes_label()),
            ])?;
        }
        out.add_table(per_agent);

        let ranking = RankingSummary::from_deviations(deviations.values().copied());
        let total = report.total_loss_secs();
        out.add_table(tile_table(
            "lossTime_RankingValue",
            &[
                ("LossTimeRanking", ranking_value(&ranking)),
                ("LossTimeSum", format!("{total:.2}")),
            ],
        )?);
        out.tiles.extend_summary_tile(TILE, ranking_value(&ranking));

        if report.zero_baseline_legs > 0 {
            log::warn!("{} legs had a zero free-flow baseline", report.zero_baseline_legs);
        }
        log::info!(
            "loss time: {} legs, {:.0} s total loss, ranking {}",
            report.legs.len(),
            total,
            ranking_value(&ranking)
        );
        Ok(())
    }
}
