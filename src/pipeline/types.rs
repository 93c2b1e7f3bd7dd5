//! Outcome types for a pipeline run

use crate::models::{RunResult, Stage};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A delivery that did not go through. Never alters the computed results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    /// Symbol whose report was being sent, `None` for run-level messages
    pub symbol: Option<String>,
    pub error: String,
}

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// One entry per watch-list symbol, in watch-list order
    pub results: Vec<RunResult>,
    pub delivery_failures: Vec<DeliveryFailure>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn delivered(&self) -> bool {
        self.delivery_failures.is_empty()
    }
}

/// A stage that ended the symbol's pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: String,
}
