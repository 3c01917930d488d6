// Closed-loop highway planning demo.
//
// Builds a circular three-lane track, seeds slower traffic, and runs the
// planner the way the external simulator would: each cycle consumes a few
// points of the previous plan and feeds the rest back as the pending path.
// Saves a plot of the track, traffic, and the path the ego actually drove.

use gnuplot::{AxesCommon, Caption, Color, Figure, PointSize, PointSymbol};
use rand::Rng;
use tracing_subscriber::EnvFilter;

use highway_planner::road::Waypoint;
use highway_planner::telemetry::{Telemetry, MPH_TO_MPS};
use highway_planner::{HighwayPlanner, PlannerConfig, PlannerState, RoadMap};

const TRACK_RADIUS: f64 = 600.0;
const CYCLES: usize = 600;
const POINTS_CONSUMED_PER_CYCLE: usize = 3;

struct TrafficCar {
    id: i64,
    s: f64,
    d: f64,
    speed: f64,
}

fn circular_map() -> RoadMap {
    let n = 180;
    let track_length = 2.0 * std::f64::consts::PI * TRACK_RADIUS;
    let waypoints = (0..n)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            Waypoint {
                x: TRACK_RADIUS * theta.cos(),
                y: TRACK_RADIUS * theta.sin(),
                s: TRACK_RADIUS * theta,
                // outward = positive lateral offset for counter-clockwise travel
                dx: theta.cos(),
                dy: theta.sin(),
            }
        })
        .collect();
    RoadMap::from_waypoints(waypoints, track_length).expect("valid synthetic track")
}

fn spawn_traffic(map: &RoadMap, config: &PlannerConfig) -> Vec<TrafficCar> {
    let mut rng = rand::thread_rng();
    (0..8)
        .map(|id| TrafficCar {
            id,
            s: rng.gen_range(60.0..map.track_length()),
            d: config.lane_center(rng.gen_range(0..config.num_lanes)),
            speed: rng.gen_range(8.0..15.0),
        })
        .collect()
}

fn sensor_fusion(map: &RoadMap, traffic: &[TrafficCar]) -> Vec<[f64; 7]> {
    traffic
        .iter()
        .map(|car| {
            let (x, y) = map.to_cartesian(car.s, car.d);
            // velocity along the local road tangent
            let (x2, y2) = map.to_cartesian(car.s + 1.0, car.d);
            let heading = (y2 - y).atan2(x2 - x);
            [
                car.id as f64,
                x,
                y,
                car.speed * heading.cos(),
                car.speed * heading.sin(),
                car.s,
                car.d,
            ]
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Highway planning demo start!");
    std::fs::create_dir_all("img").unwrap();

    let config = PlannerConfig::default();
    let map = circular_map();
    let track_length = map.track_length();
    let mut traffic = spawn_traffic(&map, &config);

    let mut snapshot = {
        let (x, y) = map.to_cartesian(5.0, config.lane_center(1));
        Telemetry {
            x,
            y,
            s: 5.0,
            d: config.lane_center(1),
            yaw: 90.0,
            speed: 0.0,
            previous_path_x: Vec::new(),
            previous_path_y: Vec::new(),
            end_path_s: 0.0,
            end_path_d: 0.0,
            sensor_fusion: sensor_fusion(&map, &traffic),
        }
    };

    let dt = config.dt;
    let planner = HighwayPlanner::new(config, map);
    let mut state = PlannerState::default();

    let mut driven_x = vec![snapshot.x];
    let mut driven_y = vec![snapshot.y];
    let mut final_plan = None;

    for cycle in 0..CYCLES {
        let (plan, next_state) = match planner.plan(state, &snapshot) {
            Ok(result) => result,
            Err(e) => {
                // a failed cycle forfeits one planning opportunity
                println!("cycle {} skipped: {}", cycle, e);
                continue;
            }
        };
        state = next_state;

        // the "simulator" executes a few points and returns the rest
        let k = POINTS_CONSUMED_PER_CYCLE;
        let here = plan.points[k - 1];
        let behind = plan.points[k - 2];
        let yaw = (here.y - behind.y).atan2(here.x - behind.x);
        let speed_mps = behind.distance(&here) / dt;
        let (s, d) = planner.map().to_frenet(here.x, here.y, yaw);

        snapshot.x = here.x;
        snapshot.y = here.y;
        snapshot.s = s;
        snapshot.d = d;
        snapshot.yaw = yaw.to_degrees();
        snapshot.speed = speed_mps / MPH_TO_MPS;
        snapshot.previous_path_x = plan.x_coords().split_off(k);
        snapshot.previous_path_y = plan.y_coords().split_off(k);

        for car in traffic.iter_mut() {
            car.s = (car.s + car.speed * k as f64 * dt) % track_length;
        }
        snapshot.sensor_fusion = sensor_fusion(planner.map(), &traffic);

        driven_x.push(here.x);
        driven_y.push(here.y);

        if cycle % 100 == 0 {
            println!(
                "cycle {:4}  s = {:7.1}  lane target = {}  v = {:5.2} m/s  {:?}",
                cycle, s, state.target_lane, speed_mps, state.maneuver
            );
        }
        final_plan = Some(plan);
    }

    println!("Done!");

    // Plot the track centerline, traffic, and the driven path
    let mut fig = Figure::new();
    let center: Vec<(f64, f64)> = (0..=360)
        .map(|deg| {
            let theta = (deg as f64).to_radians();
            (TRACK_RADIUS * theta.cos(), TRACK_RADIUS * theta.sin())
        })
        .collect();
    let center_x: Vec<f64> = center.iter().map(|p| p.0).collect();
    let center_y: Vec<f64> = center.iter().map(|p| p.1).collect();

    let traffic_positions: Vec<(f64, f64)> = traffic
        .iter()
        .map(|car| planner.map().to_cartesian(car.s, car.d))
        .collect();
    let traffic_x: Vec<f64> = traffic_positions.iter().map(|p| p.0).collect();
    let traffic_y: Vec<f64> = traffic_positions.iter().map(|p| p.1).collect();

    {
        let axes = fig
            .axes2d()
            .set_title("Highway Planner", &[])
            .set_x_label("x [m]", &[])
            .set_y_label("y [m]", &[])
            .set_aspect_ratio(gnuplot::AutoOption::Fix(1.0));
        axes.lines(&center_x, &center_y, &[Caption("Centerline"), Color("gray")]);
        axes.lines(&driven_x, &driven_y, &[Caption("Driven path"), Color("green")]);
        axes.points(
            &traffic_x,
            &traffic_y,
            &[Caption("Traffic"), Color("black"), PointSymbol('O'), PointSize(1.5)],
        );
        if let Some(plan) = &final_plan {
            axes.lines(
                &plan.x_coords(),
                &plan.y_coords(),
                &[Caption("Current plan"), Color("red")],
            );
        }
    }

    fig.save_to_svg("img/highway_demo.svg", 640, 480).unwrap();
    println!("Plot saved to img/highway_demo.svg");
}
