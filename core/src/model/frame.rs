use crate::prelude::{MissionError, MissionResult, Stage};
use serde::{Deserialize, Serialize};

/// Reference frame for altitude values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AltitudeType {
    #[serde(rename = "relativeToStartPoint", alias = "relative")]
    RelativeToStartPoint,
    #[default]
    #[serde(rename = "WGS84", alias = "wgs84")]
    Wgs84,
}

impl AltitudeType {
    /// Spelling used by the DJI `executeHeightMode` element.
    pub fn wpml_name(self) -> &'static str {
        match self {
            AltitudeType::RelativeToStartPoint => "relativeToStartPoint",
            AltitudeType::Wgs84 => "WGS84",
        }
    }
}

/// Camera orientation in degrees, GES convention (pitch 90 = horizon, 0 = straight down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// One camera sample of a source animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFrame {
    pub sequence_index: usize,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub altitude_type: AltitudeType,
    pub orientation: Orientation,
    pub timestamp: f64,
}

impl GeoFrame {
    /// Checks that indices strictly increase and timestamps never go backwards.
    pub fn validate_sequence(frames: &[GeoFrame]) -> MissionResult<()> {
        for pair in frames.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.sequence_index <= prev.sequence_index {
                return Err(MissionError::invalid(
                    Stage::Source,
                    format!(
                        "sequence index {} follows {}",
                        next.sequence_index, prev.sequence_index
                    ),
                ));
            }
            if next.timestamp < prev.timestamp {
                return Err(MissionError::invalid(
                    Stage::Source,
                    format!(
                        "timestamp {:.3}s at frame {} precedes {:.3}s",
                        next.timestamp, next.sequence_index, prev.timestamp
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Fixed ground coordinate a file's waypoints can face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: f64,
}

impl PointOfInterest {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: 0.0,
        }
    }
}
