//! HighwayPlanner - behavior and trajectory planning for highway driving
//!
//! This crate implements the planning core for an autonomous vehicle on a
//! multi-lane roadway: lane-level behavior decisions, gap analysis over
//! neighboring traffic, a jerk-limited longitudinal controller, and a
//! spline-based trajectory generator in road-relative (Frenet) coordinates.
//!
//! Transport and map storage live outside the crate; the planner consumes one
//! telemetry snapshot per control cycle and emits a fixed-length path.

// Core modules
pub mod common;
pub mod config;

// Planning modules
pub mod road;
pub mod behavior;
pub mod control;
pub mod trajectory;
pub mod planner;
pub mod telemetry;

// Re-export common types for convenience
pub use common::{PathPoint, TrajectoryPlan, VehicleState, NeighborVehicle};
pub use common::{Maneuver, PlannerState};
pub use common::{PlannerError, PlannerResult};
pub use config::PlannerConfig;
pub use planner::HighwayPlanner;
pub use road::RoadMap;
