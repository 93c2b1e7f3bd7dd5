//! Report text composition.

pub mod batch;
pub mod composer;

pub use batch::BatchComposer;
pub use composer::{ReportComposer, NARRATIVE_FALLBACK};
