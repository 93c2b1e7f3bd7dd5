//! Run-level message that bundles every symbol's outcome

use crate::common::format;
use crate::models::{RunResult, Stage};
use chrono::{DateTime, Utc};

pub const BATCH_TITLE: &str = "📊 *MARKET REPORT*";
pub const BATCH_FOOTER: &str = "🤖 _Automated report, not investment advice_";

pub struct BatchComposer;

impl BatchComposer {
    /// Header, then one block per result in watch-list order, then the footer.
    ///
    /// Failed symbols get a placeholder line so no symbol silently disappears.
    pub fn compose(
        watchlist: &[String],
        results: &[RunResult],
        generated_at: DateTime<Utc>,
    ) -> String {
        let blocks: Vec<String> = results.iter().map(Self::block).collect();

        format!(
            "{}\n\n{}\n\n{}",
            Self::header(watchlist, generated_at),
            blocks.join("\n\n"),
            BATCH_FOOTER
        )
    }

    /// Message listing only the failed symbols, used after per-symbol delivery
    pub fn compose_failures(results: &[RunResult], generated_at: DateTime<Utc>) -> Option<String> {
        let failures: Vec<String> = results
            .iter()
            .filter(|r| !r.is_success())
            .map(Self::block)
            .collect();
        if failures.is_empty() {
            return None;
        }

        Some(format!(
            "{}\n📅 {}\n\n{}",
            BATCH_TITLE,
            Self::timestamp(generated_at),
            failures.join("\n")
        ))
    }

    pub fn failure_placeholder(symbol: &str, stage: Stage, error: &str) -> String {
        format!(
            "❌ *{}*: analysis failed ({}: {})",
            symbol,
            stage,
            format::escape_markdown(error)
        )
    }

    fn block(result: &RunResult) -> String {
        match result {
            RunResult::Success(report) => report.render(),
            RunResult::Failed {
                symbol,
                stage,
                error,
            } => Self::failure_placeholder(symbol, *stage, error),
        }
    }

    fn header(watchlist: &[String], generated_at: DateTime<Utc>) -> String {
        format!(
            "{}\n📅 {}\n\n{}",
            BATCH_TITLE,
            Self::timestamp(generated_at),
            watchlist.join(", ")
        )
    }

    fn timestamp(generated_at: DateTime<Utc>) -> String {
        generated_at.format("%d.%m.%Y %H:%M UTC").to_string()
    }
}
