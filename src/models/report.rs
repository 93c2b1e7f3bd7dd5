//! Per-symbol reports and run outcomes

use crate::models::signal::Signal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a chart image the narration and delivery collaborators can fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

impl ImageRef {
    pub fn url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// One outbound message: destination, text with its formatting, optional image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub destination: String,
    pub text: String,
    pub image: Option<ImageRef>,
}

impl Delivery {
    pub fn text(destination: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: Option<ImageRef>) -> Self {
        self.image = image;
        self
    }
}

/// Composed report for one symbol. Built once by the report composer and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub symbol: String,
    pub last_close: f64,
    pub change_pct: f64,
    pub signals: Vec<Signal>,
    pub narrative: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

/// Pipeline stage a symbol is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Pending,
    Fetching,
    Computing,
    Narrating,
    Composing,
    Delivering,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pending => "pending",
            Stage::Fetching => "fetch",
            Stage::Computing => "compute",
            Stage::Narrating => "narrate",
            Stage::Composing => "compose",
            Stage::Delivering => "deliver",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Outcome for one watch-list entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunResult {
    Success(Report),
    Failed {
        symbol: String,
        stage: Stage,
        error: String,
    },
}

impl RunResult {
    pub fn symbol(&self) -> &str {
        match self {
            RunResult::Success(report) => &report.symbol,
            RunResult::Failed { symbol, .. } => symbol,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunResult::Success(_))
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            RunResult::Success(report) => Some(report),
            RunResult::Failed { .. } => None,
        }
    }
}
