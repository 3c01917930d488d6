// Gap and clearance analysis.
//
// Neighbor positions are projected forward by the length of the
// already-committed, not-yet-executed path before any comparison, so the
// checks hold at the point where newly generated path points take effect.

use crate::common::NeighborVehicle;
use crate::config::PlannerConfig;

/// Gap and closing speed to the nearest relevant leader in a lane.
///
/// When no leader is within the horizon, `gap` is the open-road sentinel and
/// `closing_speed` equals the own speed, which lets the follower law converge
/// to the cruising target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapResult {
    pub gap: f64,
    pub closing_speed: f64,
}

impl GapResult {
    /// Sentinel result meaning "no vehicle within horizon".
    pub fn open(own_speed: f64, config: &PlannerConfig) -> Self {
        Self { gap: config.open_gap, closing_speed: own_speed }
    }
}

/// A neighbor occupies `lane` iff its lateral offset falls strictly inside
/// the lane's bounds.
fn occupies_lane(neighbor: &NeighborVehicle, lane: i32, config: &PlannerConfig) -> bool {
    let center = config.lane_center(lane);
    let half = config.lane_width / 2.0;
    neighbor.d > center - half && neighbor.d < center + half
}

/// Neighbor longitudinal position at the end of the pending path.
fn projected_s(neighbor: &NeighborVehicle, pending_horizon: usize, config: &PlannerConfig) -> f64 {
    neighbor.s + pending_horizon as f64 * config.dt * neighbor.speed()
}

/// True when no occupant of `lane` will be ahead of `own_s` within the
/// following threshold.
pub fn front_clear(
    own_s: f64,
    lane: i32,
    neighbors: &[NeighborVehicle],
    pending_horizon: usize,
    config: &PlannerConfig,
) -> bool {
    !neighbors.iter().any(|n| {
        if !occupies_lane(n, lane, config) {
            return false;
        }
        let s = projected_s(n, pending_horizon, config);
        s > own_s && s - own_s < config.front_threshold
    })
}

/// Like `front_clear`, with a relaxed rear margin: a vehicle already
/// alongside or slightly behind also blocks the lane.
pub fn side_clear(
    own_s: f64,
    lane: i32,
    neighbors: &[NeighborVehicle],
    pending_horizon: usize,
    config: &PlannerConfig,
) -> bool {
    !neighbors.iter().any(|n| {
        if !occupies_lane(n, lane, config) {
            return false;
        }
        let s = projected_s(n, pending_horizon, config);
        s > own_s - config.side_rear_margin && s - own_s < config.front_threshold
    })
}

/// Gap and closing speed to the first occupant of `lane` found ahead of
/// `own_s` within the threshold; the open sentinel otherwise.
pub fn leading_gap(
    own_s: f64,
    lane: i32,
    own_speed: f64,
    neighbors: &[NeighborVehicle],
    pending_horizon: usize,
    config: &PlannerConfig,
) -> GapResult {
    for n in neighbors {
        if !occupies_lane(n, lane, config) {
            continue;
        }
        let s = projected_s(n, pending_horizon, config);
        if s > own_s && s - own_s < config.front_threshold {
            return GapResult {
                gap: s - own_s,
                closing_speed: own_speed - n.speed(),
            };
        }
    }
    GapResult::open(own_speed, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PlannerConfig {
        PlannerConfig::default()
    }

    fn neighbor(s: f64, d: f64, speed: f64) -> NeighborVehicle {
        NeighborVehicle::new(0, speed, 0.0, s, d)
    }

    #[test]
    fn test_lane_occupancy_boundary_is_strict() {
        let cfg = cfg();
        // lane 1 spans (4, 8) exclusive
        assert!(!occupies_lane(&neighbor(0.0, 4.0, 0.0), 1, &cfg));
        assert!(!occupies_lane(&neighbor(0.0, 8.0, 0.0), 1, &cfg));
        assert!(occupies_lane(&neighbor(0.0, 4.001, 0.0), 1, &cfg));
        assert!(occupies_lane(&neighbor(0.0, 7.999, 0.0), 1, &cfg));
    }

    #[test]
    fn test_front_clear_threshold() {
        let cfg = cfg();
        let blocked = vec![neighbor(130.0, 6.0, 0.0)];
        assert!(!front_clear(100.0, 1, &blocked, 0, &cfg));

        let far = vec![neighbor(160.0, 6.0, 0.0)];
        assert!(front_clear(100.0, 1, &far, 0, &cfg));

        let behind = vec![neighbor(95.0, 6.0, 0.0)];
        assert!(front_clear(100.0, 1, &behind, 0, &cfg));

        let other_lane = vec![neighbor(130.0, 2.0, 0.0)];
        assert!(front_clear(100.0, 1, &other_lane, 0, &cfg));
    }

    #[test]
    fn test_projection_compensates_pending_path() {
        let cfg = cfg();
        // fast neighbor slightly behind now, ahead of the ego once the
        // 50-point pending path has been consumed
        let n = vec![neighbor(95.0, 6.0, 20.0)];
        assert!(front_clear(100.0, 1, &n, 0, &cfg));
        assert!(!front_clear(100.0, 1, &n, 50, &cfg));
    }

    #[test]
    fn test_side_clear_rear_margin() {
        let cfg = cfg();
        // alongside slightly behind: blocks the side check, not the front one
        let n = vec![neighbor(95.0, 2.0, 0.0)];
        assert!(!side_clear(100.0, 0, &n, 0, &cfg));
        assert!(front_clear(100.0, 0, &n, 0, &cfg));

        // beyond the rear margin
        let n = vec![neighbor(85.0, 2.0, 0.0)];
        assert!(side_clear(100.0, 0, &n, 0, &cfg));
    }

    #[test]
    fn test_leading_gap() {
        let cfg = cfg();
        let n = vec![neighbor(130.0, 6.0, 15.0)];
        let result = leading_gap(100.0, 1, 20.0, &n, 0, &cfg);
        assert!((result.gap - 30.0).abs() < 1e-9);
        assert!((result.closing_speed - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_leading_gap_open_sentinel() {
        let cfg = cfg();
        let result = leading_gap(100.0, 1, 20.0, &[], 0, &cfg);
        assert_eq!(result.gap, cfg.open_gap);
        assert_eq!(result.closing_speed, 20.0);
    }
}
