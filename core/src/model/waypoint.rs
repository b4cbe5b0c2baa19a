use crate::model::frame::AltitudeType;
use serde::{Deserialize, Serialize};

/// Gimbal action attached to a waypoint; carried through to the mission container untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WaypointAction {
    /// Rotate the gimbal to an absolute pitch on reaching the waypoint.
    GimbalRotate { pitch_deg: f64 },
    /// Rotate evenly towards the pitch while flying to the next waypoint.
    GimbalEvenlyRotate { pitch_deg: f64 },
}

/// Fully resolved mission waypoint.
///
/// `heading` is a compass bearing in `[0, 360)`; `gimbal_pitch` is in DJI convention `[-90, 0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub altitude_type: AltitudeType,
    pub heading: f64,
    pub gimbal_pitch: f64,
    pub speed_m_s: f64,
    pub source_file: String,
    #[serde(default)]
    pub actions: Vec<WaypointAction>,
}

impl Waypoint {
    pub fn same_position(&self, other: &Waypoint) -> bool {
        self.latitude == other.latitude
            && self.longitude == other.longitude
            && self.altitude == other.altitude
    }
}
