//! Waypoint-synthesis core for converting GES camera animations into DJI missions.
//!
//! Frames flow through thinning, heading and pitch resolution, per-file mission
//! building, merging and metric estimation. Every stage is a pure, synchronous
//! transformation of in-memory data; reading sources and writing mission
//! containers belongs to the caller.

pub mod ges_interface;
pub mod math;
pub mod model;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{MissionError, MissionResult, Stage};
