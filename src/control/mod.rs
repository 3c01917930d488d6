// Jerk-limited longitudinal control with an Intelligent Driver Model
// following law.
//
// The desired acceleration is computed once per cycle from the cycle's gap
// and speed; the jerk-limited integration step is then re-applied for every
// generated sample so the command converges as a smooth multi-step ramp.

use crate::behavior::gap::GapResult;
use crate::config::PlannerConfig;

pub struct LongitudinalController<'a> {
    config: &'a PlannerConfig,
}

impl<'a> LongitudinalController<'a> {
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// IDM desired acceleration for the current speed and leading gap,
    /// clamped to the actuation limits.
    ///
    /// The gap is floored to `min_gap` first; a zero gap is a numerical
    /// hazard, not an error.
    pub fn desired_acceleration(&self, speed: f64, gap_result: &GapResult) -> f64 {
        let cfg = self.config;
        let gap = gap_result.gap.max(cfg.min_gap);

        let dynamic_spacing = cfg.min_spacing
            + (speed * cfg.time_headway
                + speed * gap_result.closing_speed
                    / (2.0 * (cfg.comfort_accel * cfg.comfort_decel).sqrt()))
            .max(0.0);

        let ratio = dynamic_spacing / gap;
        let a_des = cfg.comfort_accel * (1.0 - speed / cfg.max_speed - ratio * ratio);
        a_des.max(cfg.min_accel).min(cfg.max_accel)
    }

    /// One jerk-limited integration step toward `a_des`, returning the new
    /// commanded acceleration and speed. Clamps are silent saturations.
    pub fn step(&self, a_prev: f64, v_prev: f64, a_des: f64) -> (f64, f64) {
        let cfg = self.config;

        let jerk = ((a_des - a_prev) / cfg.dt).max(cfg.min_jerk).min(cfg.max_jerk);
        let a = (a_prev + jerk * cfg.dt).max(cfg.min_accel).min(cfg.max_accel);
        let v = (v_prev + a * cfg.dt).max(cfg.min_speed).min(cfg.max_speed);
        (a, v)
    }
}
