//! Stage handlers for the report pipeline
//!
//! Each handler wraps exactly one collaborator call (or one pure computation) and applies the
//! stage's timeout and retry policy. The orchestrator decides what a failure means for the symbol.

use crate::config::PipelineConfig;
use crate::indicators::{IndicatorEngine, IndicatorError};
use crate::models::{Delivery, IndicatorPoint, PriceBar, PriceSeries, Signal};
use crate::narrative::NarrativeRequest;
use crate::pipeline::context::PipelineContext;
use crate::services::{DeliveryError, FetchError, NarrationError};
use crate::signals::SignalGenerator;
use backon::{ConstantBuilder, Retryable};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Bars back used for the week-over-week change (daily bars, weekday sessions)
pub const WEEK_PERIODS: usize = 7;

/// Indicator values and signals at the latest bar, plus the bars the narration refers to
#[derive(Debug, Clone)]
pub struct Analysis {
    pub latest: PriceBar,
    pub prior: PriceBar,
    pub week_ago: PriceBar,
    pub indicators: IndicatorPoint,
    pub signals: Vec<Signal>,
}

/// Fetch the series for `symbol`, retrying retryable failures with a constant backoff.
///
/// `fetch_max_attempts` counts the first call. Unauthorized and unknown-symbol errors return
/// immediately.
pub async fn fetch_series(
    ctx: &PipelineContext,
    config: &PipelineConfig,
    symbol: &str,
) -> Result<PriceSeries, FetchError> {
    let backoff = ConstantBuilder::default()
        .with_delay(config.fetch_backoff)
        .with_max_times(config.fetch_max_attempts.saturating_sub(1));

    let mut attempt = 1;
    let series = (|| fetch_once(ctx, config, symbol))
        .retry(backoff)
        .sleep(tokio::time::sleep)
        .when(FetchError::is_retryable)
        .notify(|err: &FetchError, delay: Duration| {
            warn!(
                symbol = %symbol,
                attempt,
                max_attempts = config.fetch_max_attempts,
                error = %err,
                "Fetch attempt {} for {} failed, retrying in {:?}",
                attempt,
                symbol,
                delay
            );
            attempt += 1;
        })
        .await?;

    debug!(
        symbol = %symbol,
        count = series.len(),
        "Fetched {} bars for {}",
        series.len(),
        symbol
    );
    Ok(series)
}

async fn fetch_once(
    ctx: &PipelineContext,
    config: &PipelineConfig,
    symbol: &str,
) -> Result<PriceSeries, FetchError> {
    match timeout(
        config.fetch_timeout,
        ctx.data_provider.fetch(symbol, config.lookback_days),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(config.fetch_timeout)),
    }
}

/// Compute indicators over the whole series and the signals at its latest bar
pub fn analyze(series: &PriceSeries) -> Result<Analysis, IndicatorError> {
    let frame = IndicatorEngine::compute(series)?;
    let insufficient = || IndicatorError::InsufficientHistory {
        required: crate::indicators::MIN_HISTORY,
        actual: series.len(),
    };

    let latest = series.latest().ok_or_else(insufficient)?.clone();
    let prior = series.prior().ok_or_else(insufficient)?.clone();
    let week_ago = series
        .periods_back_or_prior(WEEK_PERIODS)
        .ok_or_else(insufficient)?
        .clone();
    let indicators = frame.latest().ok_or_else(insufficient)?;
    let signals = SignalGenerator::generate(&latest, &indicators);

    Ok(Analysis {
        latest,
        prior,
        week_ago,
        indicators,
        signals,
    })
}

pub async fn narrate(
    ctx: &PipelineContext,
    config: &PipelineConfig,
    request: &NarrativeRequest,
) -> Result<String, NarrationError> {
    match timeout(config.narration_timeout, ctx.narrator.narrate(request)).await {
        Ok(result) => result,
        Err(_) => Err(NarrationError::Timeout(config.narration_timeout)),
    }
}

pub async fn deliver(
    ctx: &PipelineContext,
    config: &PipelineConfig,
    delivery: &Delivery,
) -> Result<(), DeliveryError> {
    match timeout(config.delivery_timeout, ctx.deliverer.deliver(delivery)).await {
        Ok(result) => result,
        Err(_) => Err(DeliveryError::Timeout(config.delivery_timeout)),
    }
}
