//! The `Pipeline` struct and its module loop.

use std::time::Instant;

use lv_baseline::{BaselineEstimator, RoutingTally};
use lv_core::LiveabilityConfig;
use lv_ledger::{LedgerWriter, RunOutputs};
use lv_network::RoadNetwork;

use crate::context::RunContext;
use crate::inputs::RunInputs;
use crate::module::IndicatorModule;
use crate::{PipelineObserver, PipelineResult};

/// Outputs and routing diagnostics of one completed run.
#[derive(Debug)]
pub struct PipelineRun {
    pub outputs: RunOutputs,
    pub tally:   RoutingTally,
}

/// Runs indicator modules in order over one set of inputs.
///
/// Create via [`PipelineBuilder`][crate::PipelineBuilder].
pub struct Pipeline {
    pub(crate) config:  LiveabilityConfig,
    pub(crate) modules: Vec<Box<dyn IndicatorModule>>,
}

impl Pipeline {
    pub fn config(&self) -> &LiveabilityConfig {
        &self.config
    }

    /// Names of the registered modules in run order.
    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// A baseline estimator over `network` with this pipeline's baseline
    /// parameters.
    pub fn estimator<'a>(&self, network: &'a RoadNetwork) -> PipelineResult<BaselineEstimator<'a>> {
        Ok(BaselineEstimator::new(network, self.config.baseline.clone())?)
    }

    /// Run every module and return the in-memory outputs.
    ///
    /// The first module error aborts the run; nothing has been written at
    /// that point.
    pub fn run(
        &mut self,
        estimator: &BaselineEstimator<'_>,
        inputs:    &RunInputs,
        observer:  &mut dyn PipelineObserver,
    ) -> PipelineResult<PipelineRun> {
        observer.on_inputs(inputs);
        let mut ctx = RunContext::new(&self.config, estimator, inputs);

        for module in &mut self.modules {
            let name = module.name();
            observer.on_module_start(name);
            let started = Instant::now();
            module.run(&mut ctx)?;
            observer.on_module_end(name, started.elapsed());
        }

        let (outputs, tally) = ctx.into_parts();
        let run = PipelineRun { outputs, tally };
        observer.on_run_end(&run);
        Ok(run)
    }

    /// [`run`](Self::run), then persist everything through `writer`.
    pub fn execute(
        &mut self,
        estimator: &BaselineEstimator<'_>,
        inputs:    &RunInputs,
        observer:  &mut dyn PipelineObserver,
        writer:    &mut dyn LedgerWriter,
    ) -> PipelineResult<PipelineRun> {
        let run = self.run(estimator, inputs, observer)?;
        run.outputs.persist(writer)?;
        Ok(run)
    }
}
