//! The indicator module trait.

use crate::context::RunContext;
use crate::PipelineResult;

/// One analysis step of a run.
///
/// A module reads the run inputs, computes its indicators, and extends the
/// ledger, summary tiles, indicator catalogue, and auxiliary tables in
/// `ctx.outputs`.  Modules run one after another in the order they were
/// added to the [`PipelineBuilder`](crate::PipelineBuilder).
pub trait IndicatorModule {
    /// Stable name used in logs and duplicate checks.
    fn name(&self) -> &'static str;

    fn run(&mut self, ctx: &mut RunContext<'_, '_>) -> PipelineResult<()>;
}
