use std::sync::Arc;

use crate::classify::Events;
use crate::conf::{ConfigError, EngineConfig};
use crate::metrics::PipelineMetrics;
use crate::preprocess::Preprocessor;
use crate::timeline::{assemble, Timeline};

/// A fully wired pipeline over one input.
pub type EventTimeline<I> = Timeline<Events<Preprocessor<I>>>;

/// Runs preprocessing, classification and timeline assembly with one
/// configuration. One engine may serve many inputs; their counters add up
/// in the shared metrics.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    metrics: Arc<PipelineMetrics>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_metrics(config, Arc::new(PipelineMetrics::new()))
    }

    pub fn with_metrics(config: EngineConfig, metrics: Arc<PipelineMetrics>) -> Self {
        Self { config, metrics }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<PipelineMetrics> {
        &self.metrics
    }

    /// Lazily turn raw lines into events. Nothing is read until the
    /// timeline is pulled.
    pub fn run<I>(&self, lines: I) -> Result<EventTimeline<I::IntoIter>, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let records = Preprocessor::new(lines.into_iter(), &self.config, Arc::clone(&self.metrics))?;
        Ok(assemble(Events::new(records, Arc::clone(&self.metrics))))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
