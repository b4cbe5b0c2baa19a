use crate::model::{AltitudeType, GeoFrame, PointOfInterest, Waypoint, WaypointAction};
use crate::prelude::{MissionError, MissionResult, Stage};
use crate::processing::heading::{HeadingMode, HeadingSolver};
use crate::processing::pitch::{PitchMapper, PitchMode};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// Per-mission settings applied by the builder to every file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildSettings {
    pub altitude_type: AltitudeType,
    pub heading: HeadingMode,
    pub pitch: PitchMode,
    pub waypoint_speed_m_s: f64,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            altitude_type: AltitudeType::default(),
            heading: HeadingMode::default(),
            pitch: PitchMode::default(),
            waypoint_speed_m_s: 12.0,
        }
    }
}

/// Turns one file's thinned frames into resolved waypoints.
pub struct MissionBuilder {
    settings: BuildSettings,
    headings: HeadingSolver,
    pitches: PitchMapper,
    logger: LogManager,
}

impl MissionBuilder {
    pub fn new(settings: BuildSettings) -> MissionResult<Self> {
        if !(settings.waypoint_speed_m_s.is_finite() && settings.waypoint_speed_m_s > 0.0) {
            return Err(MissionError::invalid(
                Stage::Build,
                format!(
                    "waypoint speed {} must be positive",
                    settings.waypoint_speed_m_s
                ),
            ));
        }
        Ok(Self {
            settings,
            headings: HeadingSolver::new(settings.heading)?,
            pitches: PitchMapper::new(settings.pitch),
            logger: LogManager::new(Stage::Build),
        })
    }

    /// Builds the file's waypoints; any failure is reported against `file_id` and no waypoints are returned.
    pub fn build(
        &self,
        file_id: &str,
        frames: &[GeoFrame],
        poi: Option<&PointOfInterest>,
    ) -> MissionResult<Vec<Waypoint>> {
        let waypoints = self
            .assemble(file_id, frames, poi)
            .map_err(|err| err.in_file(file_id))?;
        self.logger
            .record(&format!("{}: {} waypoints", file_id, waypoints.len()));
        Ok(waypoints)
    }

    fn assemble(
        &self,
        file_id: &str,
        frames: &[GeoFrame],
        poi: Option<&PointOfInterest>,
    ) -> MissionResult<Vec<Waypoint>> {
        if frames.is_empty() {
            return Err(MissionError::invalid(Stage::Build, "no frames to build from"));
        }
        GeoFrame::validate_sequence(frames)?;

        let headings = self.headings.solve(frames, poi)?;
        let pitches = self.pitches.resolve(frames)?;

        let waypoints = frames
            .iter()
            .zip(headings)
            .zip(pitches)
            .map(|((frame, heading), gimbal_pitch)| Waypoint {
                latitude: frame.latitude,
                longitude: frame.longitude,
                altitude: frame.altitude,
                altitude_type: self.settings.altitude_type,
                heading,
                gimbal_pitch,
                speed_m_s: self.settings.waypoint_speed_m_s,
                source_file: file_id.to_string(),
                actions: vec![
                    WaypointAction::GimbalRotate {
                        pitch_deg: gimbal_pitch,
                    },
                    WaypointAction::GimbalEvenlyRotate {
                        pitch_deg: gimbal_pitch,
                    },
                ],
            })
            .collect();
        Ok(waypoints)
    }
}
