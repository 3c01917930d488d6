// Behavior planning: gap analysis over neighboring traffic and the
// lane-level maneuver state machine.

pub mod gap;
pub mod decision;

pub use gap::{front_clear, leading_gap, side_clear, GapResult};
pub use decision::{decide, BehaviorOutcome, SpeedConstraint};
