//! Rule-based signal detection.

pub mod categories;
pub mod generator;

pub use categories::*;
pub use generator::SignalGenerator;
