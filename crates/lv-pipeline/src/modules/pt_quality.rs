//! Public transport quality: pt/car travel time ratio and walk access.

use lv_indicators::{median, PtQualityCalculator, RankingSummary};
use lv_ledger::{Cell, Table, XytMap};

use super::{ranking_value, tile_table};
use crate::context::RunContext;
use crate::module::IndicatorModule;
use crate::PipelineResult;

pub const DIMENSION: &str = "PT Quality";
pub const TILE: &str = "PtQuality";

/// Compares every pt trip against the car alternative and measures the
/// longest walk to and from transit.
#[derive(Debug, Default)]
pub struct PtQuality;

impl IndicatorModule for PtQuality {
    fn name(&self) -> &'static str {
        "pt_quality"
    }

    fn run(&mut self, ctx: &mut RunContext<'_, '_>) -> PipelineResult<()> {
        let config = ctx.config;
        let inputs = ctx.inputs;
        let report = PtQualityCalculator::new(ctx.estimator, config).run(&inputs.trips, &inputs.walks, &inputs.area);
        let composite = report.composite_per_agent();
        let walk_rank = RankingSummary::from_deviations(report.walk_access.iter().map(|w| w.deviation));

        let out = &mut ctx.outputs;
        out.ledger.extend_with_attribute(&report.ratio_worst, "indexValue_ptCarRatio")?;
        out.ledger.extend_with_attribute(&report.walk_worst, "indexValue_walkAccess")?;
        out.ledger.extend_with_attribute(&composite, "indexValue_ptQuality")?;

        out.tiles.extend_summary_tile(TILE, ranking_value(&report.trip_ranking));

        out.indicators.extend_indicator_record(
            DIMENSION,
            "PT/car travel time ratio",
            median(report.comparisons.iter().filter_map(|c| c.ratio)),
            config.limits.pt_car_ratio.to_string(),
            ranking_value(&report.trip_ranking),
            1.0,
        );
        out.indicators.extend_indicator_record(
            DIMENSION,
            "Walk access",
            median(report.walk_access.iter().map(|w| w.longest_walk_m)),
            format!("{} m", config.limits.walk_access_m),
            ranking_value(&walk_rank),
            1.0,
        );

        let mut comparisons = Table::new(
            "ptQuality_stats_travelTimeComparison",
            ["person", "trip_id", "main_mode", "euclidean_distance", "pt_travel_time", "car_travel_time", "ratio", "deviation"],
        );
        for c in &report.comparisons {
            comparisons.push_row(vec![
                Cell::from(c.agent.as_str()),
                Cell::from(c.trip_id.as_str()),
                Cell::from(c.main_mode.as_str()),
                Cell::from(c.euclidean_distance_m),
                Cell::from(c.pt_secs),
                Cell::from(c.car_secs),
                Cell::from(c.ratio),
                Cell::from(c.deviation),
            ])?;
        }
        out.add_table(comparisons);

        let mut walks = Table::new("ptQuality_stats_walkAccess", ["person", "trip_id", "longest_walk", "deviation"]);
        for w in &report.walk_access {
            walks.push_row(vec![
                Cell::from(w.agent.as_str()),
                Cell::from(w.trip_id.as_str()),
                Cell::from(w.longest_walk_m),
                Cell::from(w.deviation),
            ])?;
        }
        out.add_table(walks);

        out.add_table(tile_table(
            "ptQuality_stats_RankingValue",
            &[
                ("PtQualityRanking", ranking_value(&report.trip_ranking)),
                ("WalkAccessRanking", ranking_value(&walk_rank)),
                ("UnresolvedTrips", report.unresolved.to_string()),
            ],
        )?);

        out.add_map(XytMap::from_values(
            "ptQuality_XYT_travelTimeComparisonPerAgent",
            config.map_crs.as_str(),
            &report.ratio_worst,
            &inputs.area,
        ));

        if report.unresolved > 0 {
            log::warn!("pt quality: {} trips without a pt or car travel time", report.unresolved);
        }
        log::info!(
            "pt quality: {} trips compared, ranking {}",
            report.trip_ranking.counted,
            ranking_value(&report.trip_ranking)
        );
        ctx.tally.merge(report.tally);
        Ok(())
    }
}
