//! Pipeline observer trait for progress reporting.

use std::time::Duration;

use crate::inputs::RunInputs;
use crate::pipeline::PipelineRun;

/// Callbacks invoked by [`Pipeline::run`][crate::Pipeline::run] around each
/// indicator module.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait PipelineObserver {
    /// Called once before the first module, with the loaded inputs.
    fn on_inputs(&mut self, _inputs: &RunInputs) {}

    fn on_module_start(&mut self, _name: &str) {}

    /// Called after a module returned successfully.
    fn on_module_end(&mut self, _name: &str, _elapsed: Duration) {}

    /// Called once after the last module, before anything is persisted.
    fn on_run_end(&mut self, _run: &PipelineRun) {}
}

/// A [`PipelineObserver`] that does nothing.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Reports module timings and the final routing tally through `log`.
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_module_start(&mut self, name: &str) {
        log::info!("running {name}");
    }

    fn on_module_end(&mut self, name: &str, elapsed: Duration) {
        log::info!("{name} finished in {:.2?}", elapsed);
    }

    fn on_run_end(&mut self, run: &PipelineRun) {
        run.tally.log_summary();
        for tile in run.outputs.tiles.tiles() {
            log::info!("{}: {}", tile.category, tile.value);
        }
    }
}
