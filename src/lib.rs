//! Daily stock market reports: indicators, rule-based signals, narrated summaries and delivery

pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod narrative;
pub mod pipeline;
pub mod report;
pub mod services;
pub mod signals;
