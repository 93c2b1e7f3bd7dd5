//! Per-symbol report pipeline: fetch, compute, narrate, compose, deliver

pub mod context;
pub mod handlers;
pub mod orchestrator;
pub mod types;

pub use context::PipelineContext;
pub use orchestrator::SymbolOrchestrator;
pub use types::{DeliveryFailure, RunSummary};
