//! Builds the report pipeline from configuration

use crate::config::Config;
use crate::pipeline::{PipelineContext, RunSummary, SymbolOrchestrator};
use crate::services::{
    AlpacaMarketData, ClientInitError, GroqNarrator, TelegramDeliverer, UrlTemplateChart,
};
use std::sync::Arc;
use tracing::info;

/// Orchestrator wired to the HTTP collaborators, plus the watch-list it runs over
pub struct ReportRuntime {
    orchestrator: Arc<SymbolOrchestrator>,
    watchlist: Vec<String>,
}

impl ReportRuntime {
    pub fn new(orchestrator: SymbolOrchestrator, watchlist: Vec<String>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            watchlist,
        }
    }

    /// Create Alpaca, Groq and Telegram clients (and the chart source when a template is set)
    pub fn from_config(config: Config) -> Result<Self, ClientInitError> {
        let pipeline = config.pipeline;

        let data_provider = AlpacaMarketData::new(config.market_data, pipeline.fetch_timeout)?;
        let narrator = GroqNarrator::new(config.narration, pipeline.narration_timeout)?;
        let destination = config.delivery.chat_id.clone();
        let deliverer = TelegramDeliverer::new(config.delivery, pipeline.delivery_timeout)?;

        let mut context = PipelineContext::new(
            Arc::new(data_provider),
            Arc::new(narrator),
            Arc::new(deliverer),
            destination,
        );
        if let Some(template) = config.chart_url_template {
            info!(template = %template, "Chart images enabled");
            context = context.with_chart_source(Arc::new(UrlTemplateChart::new(template)));
        }

        info!(
            symbols = ?config.watchlist,
            mode = ?pipeline.delivery_mode,
            "ReportRuntime: configured for {} symbol(s)",
            config.watchlist.len()
        );

        Ok(Self::new(
            SymbolOrchestrator::new(context, pipeline),
            config.watchlist,
        ))
    }

    pub fn orchestrator(&self) -> Arc<SymbolOrchestrator> {
        self.orchestrator.clone()
    }

    pub fn watchlist(&self) -> &[String] {
        &self.watchlist
    }

    pub async fn run_once(&self) -> RunSummary {
        self.orchestrator.run(&self.watchlist).await
    }
}
