//! Narration request shaping and reply parsing.

pub mod request;
pub mod verdict;

pub use request::{NarrativeRequest, NarrativeRequestBuilder};
pub use verdict::{NarrativeVerdict, Recommendation, RiskLevel};
