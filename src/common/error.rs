//! Error types for highway_planner

use std::fmt;

/// Main error type for the planner
#[derive(Debug)]
pub enum PlannerError {
    /// Road map file unreadable, empty, or malformed
    MapError(String),
    /// Telemetry snapshot could not be decoded
    TelemetryError(String),
    /// Invalid parameter
    InvalidParameter(String),
    /// Numerical computation failed (matrix inversion, etc.)
    NumericalError(String),
    /// I/O error
    IoError(std::io::Error),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::MapError(msg) => write!(f, "Map error: {}", msg),
            PlannerError::TelemetryError(msg) => write!(f, "Telemetry error: {}", msg),
            PlannerError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PlannerError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            PlannerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for PlannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlannerError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PlannerError {
    fn from(e: std::io::Error) -> Self {
        PlannerError::IoError(e)
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(e: serde_json::Error) -> Self {
        PlannerError::TelemetryError(e.to_string())
    }
}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
