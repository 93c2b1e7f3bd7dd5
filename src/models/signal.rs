//! Discrete signals derived from the latest indicator values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule family a signal belongs to. Declaration order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SignalCategory {
    Momentum,
    Trend,
    Volume,
}

impl fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalCategory::Momentum => "Momentum",
            SignalCategory::Trend => "Trend",
            SignalCategory::Volume => "Volume",
        };
        f.write_str(name)
    }
}

/// How a signal leans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Bullish,
    Bearish,
    Neutral,
    /// Unusual activity with no direction of its own
    Elevated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub category: SignalCategory,
    pub severity: Severity,
    pub text: String,
    /// Indicator reading behind the signal (RSI value, volume ratio)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Signal {
    pub fn new(category: SignalCategory, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            category,
            severity,
            text: text.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}
