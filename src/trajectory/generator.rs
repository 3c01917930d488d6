// Trajectory generation.
//
// A smooth local path is fitted through five anchors (two continuity anchors
// from the previous path, three forward anchors on the target lane
// centerline), then resampled at the control time step with the jerk-limited
// velocity profile. The retained prefix of the previous path is copied
// verbatim, which is what guarantees continuity at the splice point.

use crate::common::{PathPoint, PlannerResult, TrajectoryPlan, VehicleState};
use crate::config::PlannerConfig;
use crate::control::LongitudinalController;
use crate::road::RoadMap;
use crate::trajectory::spline::CubicSpline;

pub struct TrajectoryGenerator<'a> {
    map: &'a RoadMap,
    config: &'a PlannerConfig,
}

impl<'a> TrajectoryGenerator<'a> {
    pub fn new(map: &'a RoadMap, config: &'a PlannerConfig) -> Self {
        Self { map, config }
    }

    /// Build the next plan aiming at `target_lane`, ramping the velocity
    /// profile toward `a_des` from the previously commanded acceleration.
    ///
    /// Returns the plan and the final commanded acceleration, which becomes
    /// the next cycle's `last_acceleration`.
    pub fn generate(
        &self,
        own: &VehicleState,
        previous: &[PathPoint],
        target_lane: i32,
        a_des: f64,
        last_acceleration: f64,
    ) -> PlannerResult<(TrajectoryPlan, f64)> {
        let cfg = self.config;

        // Continuity anchors and reference frame. With enough history the
        // last two retained points recover position, heading and speed more
        // accurately than the telemetry's own fields; otherwise bootstrap
        // from the current pose.
        let (ref_point, ref_yaw, v_prev, mut anchors) = if previous.len() < cfg.reuse_limit {
            let behind =
                PathPoint::new(own.x - own.yaw.cos(), own.y - own.yaw.sin());
            let here = PathPoint::new(own.x, own.y);
            (here, own.yaw, own.speed, vec![behind, here])
        } else {
            let here = previous[cfg.reuse_limit - 1];
            let behind = previous[cfg.reuse_limit - 2];
            let yaw = (here.y - behind.y).atan2(here.x - behind.x);
            let v = behind.distance(&here) / cfg.dt;
            (here, yaw, v, vec![behind, here])
        };

        // Forward anchors on the target lane centerline
        let d_target = cfg.lane_center(target_lane);
        for offset in &cfg.anchor_offsets {
            let (x, y) = self.map.to_cartesian(own.s + offset, d_target);
            anchors.push(PathPoint::new(x, y));
        }

        // Fit in a frame where the reference heading is the forward axis;
        // keeps the spline single-valued regardless of global orientation.
        let (cos_yaw, sin_yaw) = (ref_yaw.cos(), ref_yaw.sin());
        let mut local_x = Vec::with_capacity(anchors.len());
        let mut local_y = Vec::with_capacity(anchors.len());
        for p in &anchors {
            let shift_x = p.x - ref_point.x;
            let shift_y = p.y - ref_point.y;
            local_x.push(shift_x * cos_yaw + shift_y * sin_yaw);
            local_y.push(-shift_x * sin_yaw + shift_y * cos_yaw);
        }
        let spline = CubicSpline::new(&local_x, &local_y)?;

        // Verbatim prefix of the previous path, then fresh samples
        let reuse = cfg.reuse_limit.min(previous.len());
        let mut points = Vec::with_capacity(cfg.path_points);
        points.extend_from_slice(&previous[..reuse]);

        let ctrl = LongitudinalController::new(cfg);
        let (mut a, mut v) = ctrl.step(last_acceleration, v_prev, a_des);
        let mut x = 0.0;
        while points.len() < cfg.path_points {
            x += v * cfg.dt;
            let y = spline.evaluate(x);
            points.push(PathPoint::new(
                x * cos_yaw - y * sin_yaw + ref_point.x,
                x * sin_yaw + y * cos_yaw + ref_point.y,
            ));
            let next = ctrl.step(a, v, a_des);
            a = next.0;
            v = next.1;
        }

        Ok((TrajectoryPlan::from_points(points), a))
    }
}
