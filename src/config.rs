//! Planner configuration
//!
//! Every tunable constant of the planning policy lives here as a named field,
//! so geometry and control code stay free of scattered literals.

/// Tunable parameters of the highway planner.
///
/// Distances in meters, speeds in m/s, times in seconds unless noted.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Control time step between consecutive path points [s]
    pub dt: f64,
    /// Lane width; lane centerlines sit at `lane_width/2 + lane_width * lane`
    pub lane_width: f64,
    /// Number of lanes on the ego side of the road
    pub num_lanes: i32,
    /// Total number of points emitted per cycle
    pub path_points: usize,
    /// Maximum number of previous-path points reused verbatim per cycle
    pub reuse_limit: usize,
    /// A leader within this distance ahead makes a lane "not clear"
    pub front_threshold: f64,
    /// Extra rear margin for side-lane clearance checks
    pub side_rear_margin: f64,
    /// Sentinel gap reported when no leader is within the horizon
    pub open_gap: f64,
    /// Gap floor applied before the IDM formula to avoid division blowup
    pub min_gap: f64,
    /// Longitudinal offsets of the forward spline anchors ahead of the car
    pub anchor_offsets: [f64; 3],
    /// Track length; the longitudinal coordinate wraps at this value
    pub track_length: f64,
    /// Cruising / maximum speed
    pub max_speed: f64,
    /// Minimum commanded speed
    pub min_speed: f64,
    /// Commanded acceleration bounds
    pub max_accel: f64,
    pub min_accel: f64,
    /// Commanded jerk bounds
    pub max_jerk: f64,
    pub min_jerk: f64,
    /// IDM minimum stopping buffer (s0)
    pub min_spacing: f64,
    /// IDM desired time headway
    pub time_headway: f64,
    /// IDM comfortable acceleration / deceleration magnitudes
    pub comfort_accel: f64,
    pub comfort_decel: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            dt: 0.02,
            lane_width: 4.0,
            num_lanes: 3,
            path_points: 50,
            reuse_limit: 10,
            front_threshold: 50.0,
            side_rear_margin: 10.0,
            open_gap: 1000.0,
            min_gap: 1.0,
            anchor_offsets: [30.0, 45.0, 90.0],
            track_length: 6945.554,
            max_speed: 48.0 * 0.44704,
            min_speed: 1.0,
            max_accel: 9.0,
            min_accel: -9.0,
            max_jerk: 9.0,
            min_jerk: -9.0,
            min_spacing: 20.0,
            time_headway: 1.5,
            comfort_accel: 9.0,
            comfort_decel: 9.0,
        }
    }
}

impl PlannerConfig {
    /// Lateral offset of a lane's centerline
    pub fn lane_center(&self, lane: i32) -> f64 {
        self.lane_width / 2.0 + self.lane_width * lane as f64
    }

    /// Lane index containing the lateral offset `d`
    pub fn lane_of(&self, d: f64) -> i32 {
        (d / self.lane_width).floor() as i32
    }
}
