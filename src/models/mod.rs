//! Shared data models spanning the pipeline stages.

pub mod bar;
pub mod indicators;
pub mod report;
pub mod signal;

pub use bar::{PriceBar, PriceSeries, SeriesError};
pub use indicators::{IndicatorFrame, IndicatorPoint};
pub use report::{Delivery, ImageRef, Report, RunResult, Stage};
pub use signal::{Severity, Signal, SignalCategory};
