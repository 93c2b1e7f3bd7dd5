//! Application runtime: collaborator wiring and scheduled runs

pub mod runtime;
pub mod scheduler;

pub use runtime::*;
pub use scheduler::*;
