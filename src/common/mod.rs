//! Helpers shared by the indicators, prompts and reports

pub mod format;
pub mod math;
