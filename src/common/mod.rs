//! Common types and error definitions shared across the planner

pub mod types;
pub mod error;

pub use types::*;
pub use error::{PlannerError, PlannerResult};
