//! Prompt payload for the narration collaborator

use crate::common::{format, math};
use crate::models::{ImageRef, IndicatorPoint, PriceBar, Signal};
use crate::narrative::verdict::{
    Recommendation, RiskLevel, KEY_LEVEL_LABEL, RECOMMENDATION_LABEL, RISK_LABEL, STATUS_LABEL,
};
use serde::{Deserialize, Serialize};

/// Word budget given to the narration model
pub const NARRATIVE_WORD_LIMIT: usize = 40;

/// Everything the narration collaborator needs to describe one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeRequest {
    pub symbol: String,
    pub price: f64,
    pub change_1d_pct: f64,
    pub change_1w_pct: f64,
    pub rsi14: Option<f64>,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub signals: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

impl NarrativeRequest {
    /// Render the request as the user prompt text, including the reply format contract
    pub fn prompt(&self) -> String {
        let mut lines = vec![
            format!(
                "Write a short market analysis (max {} words) for {}.",
                NARRATIVE_WORD_LIMIT, self.symbol
            ),
            String::new(),
            format!("Price: {}", format::price(self.price)),
            format!("1D change: {}", format::signed_pct(self.change_1d_pct)),
            format!("1W change: {}", format::signed_pct(self.change_1w_pct)),
            format!("RSI(14): {}", format::optional_decimal(self.rsi14, 1)),
            format!("SMA20: {}", format::optional_price(self.sma20)),
            format!("SMA50: {}", format::optional_price(self.sma50)),
            String::new(),
            "Signals:".to_string(),
        ];

        if self.signals.is_empty() {
            lines.push("- none".to_string());
        } else {
            lines.extend(self.signals.iter().map(|s| format!("- {}", s)));
        }

        if self.image.is_some() {
            lines.push(String::new());
            lines.push(
                "A daily price chart is attached; use it to confirm the trend.".to_string(),
            );
        }

        lines.push(String::new());
        lines.push("Reply in exactly this format:".to_string());
        lines.extend(response_format());

        lines.join("\n")
    }
}

/// The labeled lines the narration model is told to return
pub fn response_format() -> Vec<String> {
    let recommendations: Vec<String> = Recommendation::ALL.iter().map(|r| r.to_string()).collect();
    let risks: Vec<String> = RiskLevel::ALL.iter().map(|r| r.to_string()).collect();

    vec![
        format!("📊 {}: <one-sentence summary>", STATUS_LABEL),
        format!("💡 {}: <{}>", RECOMMENDATION_LABEL, recommendations.join("|")),
        format!("⚠️ {}: <{}>", RISK_LABEL, risks.join("|")),
        format!("🎯 {}: <price level, or n/a>", KEY_LEVEL_LABEL),
    ]
}

pub struct NarrativeRequestBuilder;

impl NarrativeRequestBuilder {
    /// Shape the numeric facts and signals for one symbol into a [`NarrativeRequest`].
    ///
    /// `week_ago` is the bar seven periods back, or the prior bar for short series.
    pub fn build(
        symbol: &str,
        latest: &PriceBar,
        prior: &PriceBar,
        week_ago: &PriceBar,
        indicators: &IndicatorPoint,
        signals: &[Signal],
        image: Option<ImageRef>,
    ) -> NarrativeRequest {
        NarrativeRequest {
            symbol: symbol.to_string(),
            price: latest.close,
            change_1d_pct: math::percent_change(latest.close, prior.close),
            change_1w_pct: math::percent_change(latest.close, week_ago.close),
            rsi14: indicators.rsi14,
            sma20: indicators.sma20,
            sma50: indicators.sma50,
            signals: signals.iter().map(|s| s.text.clone()).collect(),
            image,
        }
    }
}
