//! Common types used throughout highway_planner

/// A single point of a planned path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

impl PathPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &PathPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<(f64, f64)> for PathPoint {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

/// The ego vehicle's state for one planning cycle.
///
/// `yaw` is in radians and `speed` in m/s; the telemetry boundary converts
/// from the wire units (degrees, mph) before the planner sees the state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
    pub speed: f64,
    pub s: f64,
    pub d: f64,
}

impl VehicleState {
    pub fn new(x: f64, y: f64, yaw: f64, speed: f64, s: f64, d: f64) -> Self {
        Self { x, y, yaw, speed, s, d }
    }
}

/// One tracked external vehicle, supplied fresh each cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborVehicle {
    pub id: i64,
    pub vx: f64,
    pub vy: f64,
    pub s: f64,
    pub d: f64,
}

impl NeighborVehicle {
    pub fn new(id: i64, vx: f64, vy: f64, s: f64, d: f64) -> Self {
        Self { id, vx, vy, s, d }
    }

    pub fn speed(&self) -> f64 {
        (self.vx.powi(2) + self.vy.powi(2)).sqrt()
    }
}

/// Lane-level maneuver the planner is executing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    KeepLane,
    ChangeLeft,
    ChangeRight,
}

/// The planner's only cross-cycle memory.
///
/// Passed into `HighwayPlanner::plan` by value and returned updated, so
/// single-writer ownership is enforced by the type system rather than by
/// convention around shared globals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerState {
    pub maneuver: Maneuver,
    pub target_lane: i32,
    pub last_acceleration: f64,
}

impl Default for PlannerState {
    fn default() -> Self {
        Self {
            maneuver: Maneuver::KeepLane,
            target_lane: 1,
            last_acceleration: 0.0,
        }
    }
}

/// Planned path: a fixed number of points spaced by the control time step
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryPlan {
    pub points: Vec<PathPoint>,
}

impl TrajectoryPlan {
    pub fn from_points(points: Vec<PathPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn x_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }
}
