//! Fluent builder for constructing a [`Pipeline`].

use std::collections::HashSet;

use lv_core::LiveabilityConfig;

use crate::module::IndicatorModule;
use crate::modules::{LiveabilitySummary, LossTime, PtQuality, TrafficQuality};
use crate::{Pipeline, PipelineError, PipelineResult};

/// Fluent builder for [`Pipeline`].
///
/// Modules run in the order they are added.  The summary module reads the
/// index columns the others produced, so it must come last.
///
/// # Example
///
/// ```rust,ignore
/// let mut pipeline = PipelineBuilder::new(config).standard_modules().build()?;
/// let estimator = pipeline.estimator(&network)?;
/// pipeline.execute(&estimator, &inputs, &mut LogObserver, &mut writer)?;
/// ```
pub struct PipelineBuilder {
    config:  LiveabilityConfig,
    modules: Vec<Box<dyn IndicatorModule>>,
}

impl PipelineBuilder {
    pub fn new(config: LiveabilityConfig) -> Self {
        Self { config, modules: Vec::new() }
    }

    /// Append one module.
    pub fn module(mut self, module: impl IndicatorModule + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Traffic quality, pt quality, loss time, then the summary.
    pub fn standard_modules(self) -> Self {
        self.module(TrafficQuality)
            .module(PtQuality)
            .module(LossTime)
            .module(LiveabilitySummary)
    }

    /// Validate the configuration and the module list.
    pub fn build(self) -> PipelineResult<Pipeline> {
        self.config.validate()?;

        let Some(last) = self.modules.last() else {
            return Err(PipelineError::Config("no indicator modules registered".into()));
        };
        let summary = LiveabilitySummary.name();
        let mut seen = HashSet::new();
        for (i, module) in self.modules.iter().enumerate() {
            let name = module.name();
            if !seen.insert(name) {
                return Err(PipelineError::Config(format!("module `{name}` registered twice")));
            }
            if name == summary && i + 1 != self.modules.len() {
                return Err(PipelineError::Config(format!("`{summary}` must be the last module")));
            }
        }
        if last.name() != summary {
            log::debug!("pipeline without `{summary}`; no overall ranking will be written");
        }

        Ok(Pipeline { config: self.config, modules: self.modules })
    }
}
