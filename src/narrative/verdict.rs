//! Labels of the narration reply format and a parser for replies that follow it

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const STATUS_LABEL: &str = "STATUS";
pub const RECOMMENDATION_LABEL: &str = "RECOMMENDATION";
pub const RISK_LABEL: &str = "RISK";
pub const KEY_LEVEL_LABEL: &str = "KEY LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

impl Recommendation {
    pub const ALL: [Recommendation; 3] =
        [Recommendation::Buy, Recommendation::Hold, Recommendation::Sell];
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Recommendation::Buy => "BUY",
            Recommendation::Hold => "HOLD",
            Recommendation::Sell => "SELL",
        })
    }
}

impl FromStr for Recommendation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(Recommendation::Buy),
            "HOLD" => Ok(Recommendation::Hold),
            "SELL" => Ok(Recommendation::Sell),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        })
    }
}

impl FromStr for RiskLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Ok(RiskLevel::Low),
            "MEDIUM" => Ok(RiskLevel::Medium),
            "HIGH" => Ok(RiskLevel::High),
            _ => Err(()),
        }
    }
}

/// Structured fields recovered from a narration reply
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NarrativeVerdict {
    pub status: Option<String>,
    pub recommendation: Option<Recommendation>,
    pub risk: Option<RiskLevel>,
    pub key_level: Option<String>,
}

impl NarrativeVerdict {
    /// Pull the labeled fields out of a reply. Unknown lines are ignored and missing or
    /// malformed fields stay `None`, so any text parses.
    pub fn parse(text: &str) -> Self {
        let mut verdict = Self::default();

        for line in text.lines() {
            // Longest label first so "KEY LEVEL" is not mistaken for something shorter.
            if let Some(value) = labeled_value(line, KEY_LEVEL_LABEL) {
                if !value.is_empty() && !value.eq_ignore_ascii_case("n/a") {
                    verdict.key_level = Some(value.to_string());
                }
            } else if let Some(value) = labeled_value(line, RECOMMENDATION_LABEL) {
                verdict.recommendation = first_word(value).parse().ok();
            } else if let Some(value) = labeled_value(line, STATUS_LABEL) {
                if !value.is_empty() {
                    verdict.status = Some(value.to_string());
                }
            } else if let Some(value) = labeled_value(line, RISK_LABEL) {
                verdict.risk = first_word(value).parse().ok();
            }
        }

        verdict
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Text after `LABEL:` on a line, ignoring emoji and markdown emphasis before the label
fn labeled_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let upper = line.to_ascii_uppercase();
    let marker = format!("{}:", label);
    let start = upper.find(&marker)?;
    let prefix = &line[..start];
    if prefix.chars().any(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(line[start + marker.len()..].trim().trim_matches('*').trim())
}

fn first_word(value: &str) -> &str {
    value
        .split(|c: char| !c.is_ascii_alphabetic())
        .find(|w| !w.is_empty())
        .unwrap_or("")
}
