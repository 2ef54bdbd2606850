//! The overall liveability value.  Must run after every module that adds
//! index columns.

use std::collections::BTreeMap;

use lv_core::AgentId;
use lv_indicators::{composite, RankingSummary};
use lv_ledger::XytMap;

use super::{ranking_value, tile_table};
use crate::context::RunContext;
use crate::module::IndicatorModule;
use crate::{PipelineError, PipelineResult};

/// Ledger columns with this prefix hold a per-agent deviation.
pub const INDEX_PREFIX: &str = "indexValue_";
pub const TILE: &str = "Overall Ranking";

/// Per-agent maximum over the `indexValue_*` ledger columns.
///
/// Empty index cells are skipped.  Agents without a single index value are
/// left out of the overall value and its ranking.
#[derive(Debug, Default)]
pub struct LiveabilitySummary;

impl LiveabilitySummary {
    /// The overall value of every agent with at least one index cell.
    pub fn overall_values(ledger: &lv_ledger::Ledger) -> PipelineResult<BTreeMap<AgentId, f64>> {
        let index_cols: Vec<usize> = ledger
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.starts_with(INDEX_PREFIX))
            .map(|(i, _)| i)
            .collect();
        if index_cols.is_empty() {
            return Err(PipelineError::NoIndexColumns);
        }

        let mut overall = BTreeMap::new();
        let mut unrated = 0usize;
        for (agent, row) in ledger.rows() {
            match composite(index_cols.iter().filter_map(|&i| row[i].as_f64())) {
                Some(v) => {
                    overall.insert(agent.clone(), v);
                }
                None => unrated += 1,
            }
        }
        if unrated > 0 {
            log::debug!("{unrated} agents without any index value left out of the overall ranking");
        }
        Ok(overall)
    }
}

impl IndicatorModule for LiveabilitySummary {
    fn name(&self) -> &'static str {
        "summary"
    }

    fn run(&mut self, ctx: &mut RunContext<'_, '_>) -> PipelineResult<()> {
        let overall = Self::overall_values(&ctx.outputs.ledger)?;
        let ranking = RankingSummary::from_deviations(overall.values().copied());
        let value = ranking_value(&ranking);

        let out = &mut ctx.outputs;
        out.tiles.extend_summary_tile(TILE, value.as_str());
        out.add_table(tile_table("overallRankingTile", &[(TILE, value.clone())])?);

        let mut overview = out.indicators.to_table();
        overview.name = "overviewIndicatorTable".to_owned();
        out.add_table(overview);

        out.add_map(XytMap::from_values("agentRankingForMap", ctx.config.map_crs.as_str(), &overall, &ctx.inputs.area));

        log::info!("overall ranking: {value} of {} agents within limit", ranking.counted);
        Ok(())
    }
}
