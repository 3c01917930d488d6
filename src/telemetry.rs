// Telemetry message boundary.
//
// The transport delivers one JSON event per cycle as `["telemetry", {...}]`;
// anything else means the simulator is under manual control. Unit conversion
// (degrees to radians, mph to m/s) happens here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::common::{NeighborVehicle, PathPoint, PlannerError, PlannerResult, TrajectoryPlan,
                    VehicleState};

pub const MPH_TO_MPS: f64 = 0.44704;

/// Raw per-cycle snapshot as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct Telemetry {
    pub x: f64,
    pub y: f64,
    pub s: f64,
    pub d: f64,
    /// Heading in degrees
    pub yaw: f64,
    /// Speed in mph
    pub speed: f64,
    pub previous_path_x: Vec<f64>,
    pub previous_path_y: Vec<f64>,
    pub end_path_s: f64,
    pub end_path_d: f64,
    /// One `[id, x, y, vx, vy, s, d]` record per tracked vehicle
    pub sensor_fusion: Vec<[f64; 7]>,
}

impl Telemetry {
    /// Ego state in planner units (radians, m/s).
    pub fn vehicle_state(&self) -> VehicleState {
        VehicleState {
            x: self.x,
            y: self.y,
            yaw: self.yaw.to_radians(),
            speed: self.speed * MPH_TO_MPS,
            s: self.s,
            d: self.d,
        }
    }

    pub fn neighbors(&self) -> Vec<NeighborVehicle> {
        self.sensor_fusion
            .iter()
            .map(|r| NeighborVehicle::new(r[0] as i64, r[3], r[4], r[5], r[6]))
            .collect()
    }

    pub fn previous_path(&self) -> Vec<PathPoint> {
        self.previous_path_x
            .iter()
            .zip(self.previous_path_y.iter())
            .map(|(&x, &y)| PathPoint::new(x, y))
            .collect()
    }
}

/// One decoded inbound event.
#[derive(Debug, Clone)]
pub enum Event {
    Telemetry(Box<Telemetry>),
    /// Snapshot carried no usable telemetry (manual-control indicator)
    Manual,
}

/// Decode a transport payload of the form `["telemetry", {...}]`.
pub fn decode_event(payload: &str) -> PlannerResult<Event> {
    let value: serde_json::Value = serde_json::from_str(payload)?;
    let event = value
        .get(0)
        .and_then(|v| v.as_str())
        .ok_or_else(|| PlannerError::TelemetryError("missing event name".to_string()))?;
    if event != "telemetry" {
        return Ok(Event::Manual);
    }
    let data = value
        .get(1)
        .cloned()
        .ok_or_else(|| PlannerError::TelemetryError("missing telemetry body".to_string()))?;
    let telemetry: Telemetry = serde_json::from_value(data)?;
    Ok(Event::Telemetry(Box::new(telemetry)))
}

/// Outbound trajectory as parallel coordinate lists.
#[derive(Debug, Clone, Serialize)]
pub struct TrajectoryResponse {
    pub next_x: Vec<f64>,
    pub next_y: Vec<f64>,
}

impl From<&TrajectoryPlan> for TrajectoryResponse {
    fn from(plan: &TrajectoryPlan) -> Self {
        Self { next_x: plan.x_coords(), next_y: plan.y_coords() }
    }
}

/// Encode a plan as the transport's control message.
pub fn encode_control(plan: &TrajectoryPlan) -> PlannerResult<String> {
    let body = serde_json::to_string(&TrajectoryResponse::from(plan))?;
    Ok(format!("42[\"control\",{}]", body))
}

/// Acknowledgment emitted for non-telemetry snapshots.
pub fn manual_ack() -> &'static str {
    "42[\"manual\",{}]"
}
