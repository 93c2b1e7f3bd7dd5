//! Per-symbol report composition and rendering

use crate::common::{format, math};
use crate::models::{ImageRef, PriceBar, Report, Signal};

/// Substituted whenever narration failed or came back empty
pub const NARRATIVE_FALLBACK: &str = "AI analysis unavailable";

pub const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━";

pub struct ReportComposer;

impl ReportComposer {
    /// Merge price facts, signals and narration into a [`Report`].
    ///
    /// `narrative` is `None` when narration failed. Failure never stops composition; the
    /// fallback text takes its place.
    pub fn compose(
        symbol: &str,
        latest: &PriceBar,
        prior: &PriceBar,
        signals: Vec<Signal>,
        narrative: Option<&str>,
        image: Option<ImageRef>,
    ) -> Report {
        let narrative = narrative
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(NARRATIVE_FALLBACK)
            .to_string();

        Report {
            symbol: symbol.to_string(),
            last_close: latest.close,
            change_pct: math::percent_change(latest.close, prior.close),
            signals,
            narrative,
            image,
        }
    }
}

impl Report {
    /// Fixed-layout text of the report: header, price line, narration, signal list
    pub fn render(&self) -> String {
        let signal_lines = if self.signals.is_empty() {
            "• none".to_string()
        } else {
            self.signals
                .iter()
                .map(|s| format!("• {}", s.text))
                .collect::<Vec<_>>()
                .join("\n")
        };

        [
            SEPARATOR.to_string(),
            format!("*{}*", self.symbol),
            format!(
                "💵 {} ({})",
                format::price(self.last_close),
                format::signed_pct(self.change_pct)
            ),
            SEPARATOR.to_string(),
            String::new(),
            "🤖 *AI ANALYSIS:*".to_string(),
            self.narrative.clone(),
            String::new(),
            "📈 *SIGNALS:*".to_string(),
            signal_lines,
        ]
        .join("\n")
    }
}
