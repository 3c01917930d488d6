// Road map and Frenet coordinate transforms.
//
// The road is an ordered waypoint table with a wrap-around longitudinal
// coordinate. All transforms treat the centerline as piecewise linear between
// waypoints, so a round trip through (s, d) reproduces a point only up to the
// segment approximation.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use itertools::Itertools;
use ordered_float::OrderedFloat;
use tracing::info;

use crate::common::{PlannerError, PlannerResult};

/// One row of the waypoint table.
///
/// `(dx, dy)` is the unit lateral-offset direction stored in the map file; it
/// is carried for completeness and validated at load, but the transforms
/// derive the lateral direction from the segment itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub s: f64,
    pub dx: f64,
    pub dy: f64,
}

/// Ordered waypoint table, immutable after load
#[derive(Debug, Clone)]
pub struct RoadMap {
    waypoints: Vec<Waypoint>,
    track_length: f64,
}

impl RoadMap {
    /// Build a map from an already-assembled waypoint table.
    pub fn from_waypoints(waypoints: Vec<Waypoint>, track_length: f64) -> PlannerResult<Self> {
        if waypoints.len() < 2 {
            return Err(PlannerError::MapError(
                "waypoint table needs at least two entries".to_string(),
            ));
        }
        if track_length <= waypoints[waypoints.len() - 1].s {
            return Err(PlannerError::MapError(
                "track length must exceed the last waypoint's arclength".to_string(),
            ));
        }
        for (a, b) in waypoints.iter().tuple_windows() {
            if b.s <= a.s {
                return Err(PlannerError::MapError(format!(
                    "arclength not strictly increasing at s = {}",
                    b.s
                )));
            }
        }
        for wp in &waypoints {
            let norm = (wp.dx.powi(2) + wp.dy.powi(2)).sqrt();
            if (norm - 1.0).abs() > 1e-2 {
                return Err(PlannerError::MapError(format!(
                    "lateral direction at s = {} is not a unit vector",
                    wp.s
                )));
            }
        }
        Ok(Self { waypoints, track_length })
    }

    /// Load a map from a text table, one waypoint per line:
    /// `x y s dx dy`, whitespace separated. Any malformed line is fatal.
    pub fn from_file<P: AsRef<Path>>(path: P, track_length: f64) -> PlannerResult<Self> {
        let file = File::open(path.as_ref())?;
        let map = Self::from_reader(BufReader::new(file), track_length)?;
        info!(waypoints = map.len(), track_length, "loaded road map");
        Ok(map)
    }

    pub fn from_reader<R: BufRead>(reader: R, track_length: f64) -> PlannerResult<Self> {
        let mut waypoints = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<f64> = line
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<f64>().map_err(|_| {
                        PlannerError::MapError(format!(
                            "line {}: invalid number '{}'",
                            lineno + 1,
                            tok
                        ))
                    })
                })
                .collect::<PlannerResult<_>>()?;
            if fields.len() != 5 {
                return Err(PlannerError::MapError(format!(
                    "line {}: expected 5 fields, got {}",
                    lineno + 1,
                    fields.len()
                )));
            }
            waypoints.push(Waypoint {
                x: fields[0],
                y: fields[1],
                s: fields[2],
                dx: fields[3],
                dy: fields[4],
            });
        }
        Self::from_waypoints(waypoints, track_length)
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn track_length(&self) -> f64 {
        self.track_length
    }

    /// Index of the waypoint nearest to `(x, y)`; ties go to the first found.
    pub fn closest_waypoint(&self, x: f64, y: f64) -> usize {
        self.waypoints
            .iter()
            .position_min_by_key(|wp| OrderedFloat((wp.x - x).powi(2) + (wp.y - y).powi(2)))
            .unwrap_or(0)
    }

    /// The closest waypoint, advanced by one (with wrap) when it lies behind
    /// the vehicle heading. Disambiguates "closest" from "next ahead".
    pub fn next_waypoint(&self, x: f64, y: f64, heading: f64) -> usize {
        let closest = self.closest_waypoint(x, y);
        let wp = &self.waypoints[closest];

        let bearing = (wp.y - y).atan2(wp.x - x);
        let mut angle = (heading - bearing).abs();
        angle = angle.min(2.0 * PI - angle);

        if angle > PI / 4.0 {
            (closest + 1) % self.waypoints.len()
        } else {
            closest
        }
    }

    /// Project a Cartesian position onto the centerline, returning `(s, d)`.
    ///
    /// The lateral sign comes from the reference segment's rightward normal,
    /// which is exactly the `heading - pi/2` perpendicular `to_cartesian`
    /// offsets along.
    pub fn to_frenet(&self, x: f64, y: f64, heading: f64) -> (f64, f64) {
        let next = self.next_waypoint(x, y, heading);
        let prev = if next == 0 { self.waypoints.len() - 1 } else { next - 1 };

        let nx = self.waypoints[next].x - self.waypoints[prev].x;
        let ny = self.waypoints[next].y - self.waypoints[prev].y;
        let px = x - self.waypoints[prev].x;
        let py = y - self.waypoints[prev].y;

        // projection of the offset onto the segment
        let proj_norm = (px * nx + py * ny) / (nx * nx + ny * ny);
        let proj_x = proj_norm * nx;
        let proj_y = proj_norm * ny;

        let perp_x = px - proj_x;
        let perp_y = py - proj_y;
        let mut d = (perp_x.powi(2) + perp_y.powi(2)).sqrt();
        if perp_x * ny - perp_y * nx < 0.0 {
            d = -d;
        }

        let mut s = 0.0;
        for i in 0..prev {
            let a = &self.waypoints[i];
            let b = &self.waypoints[i + 1];
            s += ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
        }
        s += (proj_x.powi(2) + proj_y.powi(2)).sqrt();

        (s, d)
    }

    /// Locate `(s, d)` on the road, wrapping `s` at the track length.
    pub fn to_cartesian(&self, s: f64, d: f64) -> (f64, f64) {
        let s = s.rem_euclid(self.track_length);

        let prev = self
            .waypoints
            .iter()
            .rposition(|wp| wp.s <= s)
            .unwrap_or(0);
        let next = (prev + 1) % self.waypoints.len();

        let heading = (self.waypoints[next].y - self.waypoints[prev].y)
            .atan2(self.waypoints[next].x - self.waypoints[prev].x);
        let seg_s = s - self.waypoints[prev].s;

        let seg_x = self.waypoints[prev].x + seg_s * heading.cos();
        let seg_y = self.waypoints[prev].y + seg_s * heading.sin();

        let perp = heading - PI / 2.0;
        (seg_x + d * perp.cos(), seg_y + d * perp.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    /// Straight road along +x, waypoints every 10 m, positive d to the right (-y)
    fn straight_map() -> RoadMap {
        let waypoints = (0..10)
            .map(|i| Waypoint {
                x: 10.0 * i as f64,
                y: 0.0,
                s: 10.0 * i as f64,
                dx: 0.0,
                dy: -1.0,
            })
            .collect();
        RoadMap::from_waypoints(waypoints, 100.0).unwrap()
    }

    #[test]
    fn test_closest_waypoint_tie_first_occurrence() {
        let map = straight_map();
        // (25, 0) is equidistant from waypoints 2 and 3
        assert_eq!(map.closest_waypoint(25.0, 0.0), 2);
    }

    #[test]
    fn test_next_waypoint_advances_past_closest() {
        let map = straight_map();
        // closest is behind the heading, so the next one is returned
        assert_eq!(map.next_waypoint(21.0, 0.5, 0.0), 3);
        // closest is ahead, no advance
        assert_eq!(map.next_waypoint(19.0, 0.5, 0.0), 2);
    }

    #[test]
    fn test_to_frenet_signed_offset() {
        let map = straight_map();
        let (s, d) = map.to_frenet(25.0, -3.0, 0.0);
        assert_relative_eq!(s, 25.0, epsilon = 1e-9);
        assert_relative_eq!(d, 3.0, epsilon = 1e-9);

        let (_, d_left) = map.to_frenet(25.0, 3.0, 0.0);
        assert_relative_eq!(d_left, -3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_round_trip() {
        let map = straight_map();
        for &(x, y) in &[(25.0, -3.0), (42.0, -6.5), (17.3, 1.2)] {
            let (s, d) = map.to_frenet(x, y, 0.0);
            let (rx, ry) = map.to_cartesian(s, d);
            assert_relative_eq!(rx, x, epsilon = 1e-6);
            assert_relative_eq!(ry, y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_to_cartesian_wraps() {
        let map = straight_map();
        let a = map.to_cartesian(5.0, 2.0);
        let b = map.to_cartesian(105.0, 2.0);
        assert_relative_eq!(a.0, b.0, epsilon = 1e-9);
        assert_relative_eq!(a.1, b.1, epsilon = 1e-9);
    }

    #[test]
    fn test_from_reader() {
        let text = "0.0 0.0 0.0 0.0 -1.0\n10.0 0.0 10.0 0.0 -1.0\n";
        let map = RoadMap::from_reader(Cursor::new(text), 20.0).unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_malformed_line_is_fatal() {
        let text = "0.0 0.0 0.0 0.0 -1.0\n10.0 zero 10.0 0.0 -1.0\n";
        let err = RoadMap::from_reader(Cursor::new(text), 20.0).unwrap_err();
        assert!(matches!(err, PlannerError::MapError(_)));
    }

    #[test]
    fn test_empty_map_is_fatal() {
        let err = RoadMap::from_reader(Cursor::new(""), 20.0).unwrap_err();
        assert!(matches!(err, PlannerError::MapError(_)));
    }

    #[test]
    fn test_wrong_field_count_is_fatal() {
        let text = "0.0 0.0 0.0 0.0\n";
        let err = RoadMap::from_reader(Cursor::new(text), 20.0).unwrap_err();
        assert!(matches!(err, PlannerError::MapError(_)));
    }
}
