//! Sequential per-symbol orchestration over the watch-list

use crate::config::{DeliveryMode, PipelineConfig};
use crate::models::{Delivery, Report, RunResult, Stage};
use crate::narrative::{NarrativeRequestBuilder, NarrativeVerdict};
use crate::pipeline::context::PipelineContext;
use crate::pipeline::handlers;
use crate::pipeline::types::{DeliveryFailure, RunSummary, StageFailure};
use crate::report::{BatchComposer, ReportComposer};
use chrono::Utc;
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Tracks the stage a symbol is in so a failure can name where it happened
struct StageTracker<'a> {
    symbol: &'a str,
    stage: Stage,
}

impl<'a> StageTracker<'a> {
    fn new(symbol: &'a str) -> Self {
        Self {
            symbol,
            stage: Stage::Pending,
        }
    }

    fn advance(&mut self, next: Stage) {
        debug!(symbol = %self.symbol, from = %self.stage, to = %next, "{}: {} -> {}", self.symbol, self.stage, next);
        self.stage = next;
    }

    fn fail(&self, err: impl Display) -> StageFailure {
        StageFailure {
            stage: self.stage,
            error: err.to_string(),
        }
    }
}

/// Drives every watch-list symbol through fetch, compute, narrate, compose and deliver.
///
/// Symbols run one after another in watch-list order. A failure in any stage ends that
/// symbol only; the rest of the run continues.
pub struct SymbolOrchestrator {
    context: PipelineContext,
    config: PipelineConfig,
}

impl SymbolOrchestrator {
    pub fn new(context: PipelineContext, config: PipelineConfig) -> Self {
        Self { context, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&self, watchlist: &[String]) -> RunSummary {
        let started_at = Utc::now();
        let timer = Instant::now();
        info!(
            symbols = watchlist.len(),
            mode = ?self.config.delivery_mode,
            "Starting report run for {} symbol(s)",
            watchlist.len()
        );

        let mut results = Vec::with_capacity(watchlist.len());
        let mut delivery_failures = Vec::new();

        for (index, symbol) in watchlist.iter().enumerate() {
            if index > 0 && !self.config.symbol_delay.is_zero() {
                tokio::time::sleep(self.config.symbol_delay).await;
            }

            let span = info_span!("symbol", symbol = %symbol);
            let result = self
                .process_symbol(symbol, &mut delivery_failures)
                .instrument(span)
                .await;
            results.push(result);
        }

        match self.config.delivery_mode {
            DeliveryMode::Batch => {
                let text = BatchComposer::compose(watchlist, &results, started_at);
                self.deliver_run_message(text, &mut delivery_failures).await;
            }
            DeliveryMode::PerSymbol => {
                if let Some(text) = BatchComposer::compose_failures(&results, started_at) {
                    self.deliver_run_message(text, &mut delivery_failures).await;
                }
            }
        }

        let summary = RunSummary {
            started_at,
            elapsed: timer.elapsed(),
            results,
            delivery_failures,
        };

        info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            delivery_failures = summary.delivery_failures.len(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Report run finished: {} succeeded, {} failed",
            summary.succeeded(),
            summary.failed()
        );
        summary
    }

    async fn process_symbol(
        &self,
        symbol: &str,
        delivery_failures: &mut Vec<DeliveryFailure>,
    ) -> RunResult {
        match self.run_stages(symbol, delivery_failures).await {
            Ok(report) => {
                info!(
                    symbol = %symbol,
                    signals = report.signals.len(),
                    change_pct = report.change_pct,
                    "{}: report ready",
                    symbol
                );
                RunResult::Success(report)
            }
            Err(failure) => {
                error!(
                    symbol = %symbol,
                    stage = %failure.stage,
                    error = %failure.error,
                    "{}: failed at {} stage",
                    symbol,
                    failure.stage
                );
                RunResult::Failed {
                    symbol: symbol.to_string(),
                    stage: failure.stage,
                    error: failure.error,
                }
            }
        }
    }

    async fn run_stages(
        &self,
        symbol: &str,
        delivery_failures: &mut Vec<DeliveryFailure>,
    ) -> Result<Report, StageFailure> {
        let mut tracker = StageTracker::new(symbol);

        tracker.advance(Stage::Fetching);
        let series = handlers::fetch_series(&self.context, &self.config, symbol)
            .await
            .map_err(|e| tracker.fail(e))?;

        tracker.advance(Stage::Computing);
        let analysis = handlers::analyze(&series).map_err(|e| tracker.fail(e))?;

        tracker.advance(Stage::Narrating);
        let image = self
            .context
            .chart_source
            .as_ref()
            .and_then(|source| source.chart(symbol));
        let request = NarrativeRequestBuilder::build(
            symbol,
            &analysis.latest,
            &analysis.prior,
            &analysis.week_ago,
            &analysis.indicators,
            &analysis.signals,
            image.clone(),
        );
        let narrative = match handlers::narrate(&self.context, &self.config, &request).await {
            Ok(text) => {
                let verdict = NarrativeVerdict::parse(&text);
                if verdict.is_empty() {
                    debug!(symbol = %symbol, "{}: narration did not follow the reply format", symbol);
                } else {
                    info!(
                        symbol = %symbol,
                        recommendation = ?verdict.recommendation,
                        risk = ?verdict.risk,
                        key_level = ?verdict.key_level,
                        "{}: narration verdict",
                        symbol
                    );
                }
                Some(text)
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "{}: narration unavailable, using fallback", symbol);
                None
            }
        };

        tracker.advance(Stage::Composing);
        let report = ReportComposer::compose(
            symbol,
            &analysis.latest,
            &analysis.prior,
            analysis.signals,
            narrative.as_deref(),
            image,
        );

        tracker.advance(Stage::Delivering);
        if self.config.delivery_mode == DeliveryMode::PerSymbol {
            let delivery = Delivery::text(&self.context.destination, report.render())
                .with_image(report.image.clone());
            if let Err(e) = handlers::deliver(&self.context, &self.config, &delivery).await {
                error!(symbol = %symbol, error = %e, "{}: delivery failed", symbol);
                delivery_failures.push(DeliveryFailure {
                    symbol: Some(symbol.to_string()),
                    error: e.to_string(),
                });
            }
        }

        tracker.advance(Stage::Done);
        Ok(report)
    }

    async fn deliver_run_message(&self, text: String, delivery_failures: &mut Vec<DeliveryFailure>) {
        let delivery = Delivery::text(&self.context.destination, text);
        match handlers::deliver(&self.context, &self.config, &delivery).await {
            Ok(()) => info!(destination = %self.context.destination, "Run report delivered"),
            Err(e) => {
                error!(error = %e, "Run report delivery failed");
                delivery_failures.push(DeliveryFailure {
                    symbol: None,
                    error: e.to_string(),
                });
            }
        }
    }
}
