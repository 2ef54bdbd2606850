//! Shared state handed to every indicator module.

use std::rc::Rc;

use lv_baseline::{BaselineEstimator, RoutingTally};
use lv_core::LiveabilityConfig;
use lv_indicators::{LossCalculator, LossReport};
use lv_ledger::{Ledger, RunOutputs};

use crate::inputs::RunInputs;
use crate::PipelineResult;

/// One run's read-only inputs and mutable outputs.
///
/// Modules read `inputs` and extend `outputs`; nothing is written to disk
/// until the pipeline persists the outputs after the last module.
pub struct RunContext<'r, 'a> {
    pub config:    &'r LiveabilityConfig,
    pub estimator: &'r BaselineEstimator<'a>,
    pub inputs:    &'r RunInputs,
    pub outputs:   RunOutputs,
    /// Routing diagnostics merged from every module.
    pub tally:     RoutingTally,
    loss:          Option<Rc<LossReport>>,
}

impl<'r, 'a> RunContext<'r, 'a> {
    /// Context with a fresh ledger over the study area.
    pub fn new(config: &'r LiveabilityConfig, estimator: &'r BaselineEstimator<'a>, inputs: &'r RunInputs) -> Self {
        Self {
            config,
            estimator,
            inputs,
            outputs: RunOutputs::new(Ledger::from_study_area(&inputs.area)),
            tally: RoutingTally::new(),
            loss: None,
        }
    }

    /// The leg loss report, computed on first use and shared by every
    /// module after that.
    pub fn loss_report(&mut self) -> PipelineResult<Rc<LossReport>> {
        if let Some(report) = &self.loss {
            return Ok(Rc::clone(report));
        }
        let report = LossCalculator::new(self.estimator, self.config)?.run(&self.inputs.legs, &self.inputs.area);
        self.tally.merge(report.tally.clone());
        let report = Rc::new(report);
        self.loss = Some(Rc::clone(&report));
        Ok(report)
    }

    pub(crate) fn into_parts(self) -> (RunOutputs, RoutingTally) {
        (self.outputs, self.tally)
    }
}
