// Lane-level behavior state machine.
//
// States: KeepLane, ChangeLeft, ChangeRight. A lane change, once entered, is
// never aborted before the vehicle reaches the target lane.

use tracing::debug;

use crate::behavior::gap::{self, GapResult};
use crate::common::{Maneuver, NeighborVehicle, PlannerState, VehicleState};
use crate::config::PlannerConfig;

/// Speed constraint handed to the longitudinal controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedConstraint {
    /// No leader constrains the ego; drive at the cruising target.
    Cruise,
    /// Follow the lead vehicle described by the gap result.
    Follow(GapResult),
}

/// Result of one behavior evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorOutcome {
    pub maneuver: Maneuver,
    pub target_lane: i32,
    pub constraint: SpeedConstraint,
}

/// Evaluate the behavior state machine for one cycle.
///
/// `target_lane` is rewritten only when a lane change is initiated; across
/// KeepLane cycles it persists, so the trajectory generator keeps centering
/// on the lane last committed to.
pub fn decide(
    state: &PlannerState,
    own: &VehicleState,
    neighbors: &[NeighborVehicle],
    pending_horizon: usize,
    config: &PlannerConfig,
) -> BehaviorOutcome {
    let lane = config.lane_of(own.d);

    match state.maneuver {
        Maneuver::ChangeLeft | Maneuver::ChangeRight if lane != state.target_lane => {
            // change still in flight, commit to completion
            BehaviorOutcome {
                maneuver: state.maneuver,
                target_lane: state.target_lane,
                constraint: SpeedConstraint::Cruise,
            }
        }
        Maneuver::ChangeLeft | Maneuver::ChangeRight => {
            debug!(lane, "lane change complete");
            BehaviorOutcome {
                maneuver: Maneuver::KeepLane,
                target_lane: state.target_lane,
                constraint: SpeedConstraint::Cruise,
            }
        }
        Maneuver::KeepLane => {
            if gap::front_clear(own.s, lane, neighbors, pending_horizon, config) {
                return BehaviorOutcome {
                    maneuver: Maneuver::KeepLane,
                    target_lane: state.target_lane,
                    constraint: SpeedConstraint::Cruise,
                };
            }

            for &candidate in &change_candidates(lane, config) {
                if gap::side_clear(own.s, candidate, neighbors, pending_horizon, config) {
                    let maneuver = if candidate > lane {
                        Maneuver::ChangeRight
                    } else {
                        Maneuver::ChangeLeft
                    };
                    debug!(from = lane, to = candidate, ?maneuver, "initiating lane change");
                    return BehaviorOutcome {
                        maneuver,
                        target_lane: candidate,
                        constraint: SpeedConstraint::Cruise,
                    };
                }
            }

            // no escape lane: fall back to car following behind the leader
            let result =
                gap::leading_gap(own.s, lane, own.speed, neighbors, pending_horizon, config);
            BehaviorOutcome {
                maneuver: Maneuver::KeepLane,
                target_lane: state.target_lane,
                constraint: SpeedConstraint::Follow(result),
            }
        }
    }
}

/// Eligible neighbor lanes in fixed priority order: edge lanes have a single
/// candidate, middle lanes prefer the right neighbor.
fn change_candidates(lane: i32, config: &PlannerConfig) -> Vec<i32> {
    if lane <= 0 {
        vec![lane + 1]
    } else if lane >= config.num_lanes - 1 {
        vec![lane - 1]
    } else {
        vec![lane + 1, lane - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::gap::GapResult;

    fn cfg() -> PlannerConfig {
        PlannerConfig::default()
    }

    fn own(s: f64, d: f64, speed: f64) -> VehicleState {
        VehicleState::new(0.0, 0.0, 0.0, speed, s, d)
    }

    fn state(maneuver: Maneuver, target_lane: i32) -> PlannerState {
        PlannerState { maneuver, target_lane, last_acceleration: 0.0 }
    }

    fn neighbor(s: f64, d: f64, speed: f64) -> NeighborVehicle {
        NeighborVehicle::new(0, speed, 0.0, s, d)
    }

    #[test]
    fn test_free_road_keeps_lane() {
        let out = decide(&PlannerState::default(), &own(100.0, 6.0, 20.0), &[], 0, &cfg());
        assert_eq!(out.maneuver, Maneuver::KeepLane);
        assert_eq!(out.target_lane, 1);
        assert_eq!(out.constraint, SpeedConstraint::Cruise);
    }

    #[test]
    fn test_blocked_leftmost_changes_right() {
        // ego in lane 0, leader 30 m ahead, lane 1 empty
        let neighbors = vec![neighbor(130.0, 2.0, 15.0)];
        let out = decide(
            &state(Maneuver::KeepLane, 0),
            &own(100.0, 2.0, 20.0),
            &neighbors,
            0,
            &cfg(),
        );
        assert_eq!(out.maneuver, Maneuver::ChangeRight);
        assert_eq!(out.target_lane, 1);
        assert_eq!(out.constraint, SpeedConstraint::Cruise);
    }

    #[test]
    fn test_blocked_rightmost_changes_left() {
        let neighbors = vec![neighbor(130.0, 10.0, 15.0)];
        let out = decide(
            &state(Maneuver::KeepLane, 2),
            &own(100.0, 10.0, 20.0),
            &neighbors,
            0,
            &cfg(),
        );
        assert_eq!(out.maneuver, Maneuver::ChangeLeft);
        assert_eq!(out.target_lane, 1);
    }

    #[test]
    fn test_middle_lane_prefers_right() {
        let neighbors = vec![neighbor(130.0, 6.0, 15.0)];
        let out = decide(
            &state(Maneuver::KeepLane, 1),
            &own(100.0, 6.0, 20.0),
            &neighbors,
            0,
            &cfg(),
        );
        assert_eq!(out.maneuver, Maneuver::ChangeRight);
        assert_eq!(out.target_lane, 2);
    }

    #[test]
    fn test_middle_lane_falls_back_left() {
        // own lane and right lane blocked, left clear
        let neighbors = vec![
            neighbor(130.0, 6.0, 15.0),
            neighbor(110.0, 10.0, 15.0),
        ];
        let out = decide(
            &state(Maneuver::KeepLane, 1),
            &own(100.0, 6.0, 20.0),
            &neighbors,
            0,
            &cfg(),
        );
        assert_eq!(out.maneuver, Maneuver::ChangeLeft);
        assert_eq!(out.target_lane, 0);
    }

    #[test]
    fn test_blocked_no_escape_follows_leader() {
        let neighbors = vec![
            neighbor(130.0, 6.0, 15.0), // leader in own lane
            neighbor(105.0, 2.0, 15.0), // left blocked
            neighbor(105.0, 10.0, 15.0), // right blocked
        ];
        let out = decide(
            &state(Maneuver::KeepLane, 1),
            &own(100.0, 6.0, 20.0),
            &neighbors,
            0,
            &cfg(),
        );
        assert_eq!(out.maneuver, Maneuver::KeepLane);
        assert_eq!(out.target_lane, 1);
        match out.constraint {
            SpeedConstraint::Follow(GapResult { gap, closing_speed }) => {
                assert!((gap - 30.0).abs() < 1e-9);
                assert!((closing_speed - 5.0).abs() < 1e-9);
            }
            other => panic!("expected follow constraint, got {:?}", other),
        }
    }

    #[test]
    fn test_commit_to_completion() {
        // change to lane 0 in flight, ego still in lane 1; a clear front must
        // not revert the maneuver
        let out = decide(
            &state(Maneuver::ChangeLeft, 0),
            &own(100.0, 6.0, 20.0),
            &[],
            0,
            &cfg(),
        );
        assert_eq!(out.maneuver, Maneuver::ChangeLeft);
        assert_eq!(out.target_lane, 0);

        // once the ego reaches the target lane the maneuver completes
        let out = decide(
            &state(Maneuver::ChangeLeft, 0),
            &own(100.0, 2.0, 20.0),
            &[],
            0,
            &cfg(),
        );
        assert_eq!(out.maneuver, Maneuver::KeepLane);
        assert_eq!(out.target_lane, 0);
    }
}
