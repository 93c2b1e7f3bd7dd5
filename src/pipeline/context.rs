//! Collaborators injected into a pipeline run

use crate::services::{ChartSource, Deliverer, MarketDataProvider, Narrator};
use std::sync::Arc;

/// Context shared by every stage of a run
///
/// Holds the external collaborators behind trait objects so tests can swap in fakes:
/// - Market data provider (daily bars)
/// - Narrator (natural-language analysis)
/// - Deliverer plus the destination every message goes to
/// - Optional chart source for image references
pub struct PipelineContext {
    pub data_provider: Arc<dyn MarketDataProvider + Send + Sync>,
    pub narrator: Arc<dyn Narrator + Send + Sync>,
    pub deliverer: Arc<dyn Deliverer + Send + Sync>,
    pub chart_source: Option<Arc<dyn ChartSource + Send + Sync>>,
    pub destination: String,
}

impl PipelineContext {
    pub fn new(
        data_provider: Arc<dyn MarketDataProvider + Send + Sync>,
        narrator: Arc<dyn Narrator + Send + Sync>,
        deliverer: Arc<dyn Deliverer + Send + Sync>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            data_provider,
            narrator,
            deliverer,
            chart_source: None,
            destination: destination.into(),
        }
    }

    pub fn with_chart_source(mut self, chart_source: Arc<dyn ChartSource + Send + Sync>) -> Self {
        self.chart_source = Some(chart_source);
        self
    }
}
