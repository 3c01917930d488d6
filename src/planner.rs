// Control loop orchestrator.
//
// One call per inbound snapshot: gap analysis feeds the behavior decision,
// the decision's speed constraint feeds the longitudinal controller, and the
// trajectory generator turns the target lane and velocity ramp into the
// output path. The persistent state flows in by value and out updated.

use tracing::debug;

use crate::behavior::{self, SpeedConstraint};
use crate::behavior::gap::GapResult;
use crate::common::{PlannerResult, PlannerState, TrajectoryPlan};
use crate::config::PlannerConfig;
use crate::control::LongitudinalController;
use crate::road::RoadMap;
use crate::telemetry::Telemetry;
use crate::trajectory::TrajectoryGenerator;

pub struct HighwayPlanner {
    config: PlannerConfig,
    map: RoadMap,
}

impl HighwayPlanner {
    pub fn new(config: PlannerConfig, map: RoadMap) -> Self {
        Self { config, map }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn map(&self) -> &RoadMap {
        &self.map
    }

    /// Plan one cycle. Consumes the previous persistent state and returns
    /// the updated one alongside the new plan; every other quantity is
    /// recomputed from the fresh snapshot.
    pub fn plan(
        &self,
        state: PlannerState,
        telemetry: &Telemetry,
    ) -> PlannerResult<(TrajectoryPlan, PlannerState)> {
        let own = telemetry.vehicle_state();
        let neighbors = telemetry.neighbors();
        let previous = telemetry.previous_path();

        let outcome = behavior::decide(&state, &own, &neighbors, previous.len(), &self.config);

        let controller = LongitudinalController::new(&self.config);
        let gap = match outcome.constraint {
            SpeedConstraint::Cruise => GapResult::open(own.speed, &self.config),
            SpeedConstraint::Follow(result) => result,
        };
        let a_des = controller.desired_acceleration(own.speed, &gap);

        let generator = TrajectoryGenerator::new(&self.map, &self.config);
        let (plan, last_acceleration) = generator.generate(
            &own,
            &previous,
            outcome.target_lane,
            a_des,
            state.last_acceleration,
        )?;

        debug!(
            maneuver = ?outcome.maneuver,
            target_lane = outcome.target_lane,
            speed = own.speed,
            gap = gap.gap,
            a_des,
            "planned cycle"
        );

        Ok((
            plan,
            PlannerState {
                maneuver: outcome.maneuver,
                target_lane: outcome.target_lane,
                last_acceleration,
            },
        ))
    }
}
