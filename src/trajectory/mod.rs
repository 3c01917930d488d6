// Trajectory generation: smooth local path fitting and resampling.

pub mod spline;
pub mod generator;

pub use generator::TrajectoryGenerator;
pub use spline::CubicSpline;
