use crate::model::GeoFrame;
use crate::prelude::{MissionError, MissionResult, Stage};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// DJI gimbal pitch limits: 0 is the horizon, -90 straight down.
pub const MIN_GIMBAL_PITCH: f64 = -90.0;
pub const MAX_GIMBAL_PITCH: f64 = 0.0;

/// Values outside this window before clamping indicate malformed input.
const SANE_PITCH_RANGE: std::ops::RangeInclusive<f64> = -180.0..=90.0;

/// Zero reference of a pitch value handed to the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchConvention {
    /// GES camera tilt: 90 is the horizon, 0 straight down.
    Ges,
    /// DJI gimbal pitch: 0 is the horizon, -90 straight down.
    Dji,
}

/// Where each waypoint's gimbal pitch comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PitchMode {
    /// One operator-supplied pitch, DJI convention, for every waypoint of a file.
    Fixed { pitch_deg: f64 },
    /// The frame's own GES tilt, remapped per waypoint.
    FromSource,
}

impl Default for PitchMode {
    fn default() -> Self {
        PitchMode::Fixed { pitch_deg: 0.0 }
    }
}

pub struct PitchMapper {
    mode: PitchMode,
    logger: LogManager,
}

impl PitchMapper {
    pub fn new(mode: PitchMode) -> Self {
        Self {
            mode,
            logger: LogManager::new(Stage::Pitch),
        }
    }

    /// Converts a pitch into DJI convention and clamps it to `[-90, 0]`.
    pub fn map_pitch(value: f64, convention: PitchConvention) -> MissionResult<f64> {
        let dji = match convention {
            PitchConvention::Ges => value - 90.0,
            PitchConvention::Dji => value,
        };
        if !dji.is_finite() || !SANE_PITCH_RANGE.contains(&dji) {
            return Err(MissionError::invalid(
                Stage::Pitch,
                format!("pitch {} maps to {} outside [-180, 90]", value, dji),
            ));
        }
        Ok(dji.clamp(MIN_GIMBAL_PITCH, MAX_GIMBAL_PITCH))
    }

    /// One DJI gimbal pitch per frame.
    pub fn resolve(&self, frames: &[GeoFrame]) -> MissionResult<Vec<f64>> {
        match self.mode {
            PitchMode::Fixed { pitch_deg } => {
                let pitch = Self::map_pitch(pitch_deg, PitchConvention::Dji)?;
                if pitch != pitch_deg {
                    self.logger.warn(&format!(
                        "fixed pitch {:.1} clamped to {:.1}",
                        pitch_deg, pitch
                    ));
                }
                Ok(vec![pitch; frames.len()])
            }
            PitchMode::FromSource => frames
                .iter()
                .map(|frame| Self::map_pitch(frame.orientation.pitch, PitchConvention::Ges))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AltitudeType, Orientation};
    use proptest::prelude::*;

    fn frame_with_pitch(pitch: f64) -> GeoFrame {
        GeoFrame {
            sequence_index: 0,
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            altitude_type: AltitudeType::Wgs84,
            orientation: Orientation {
                yaw: 0.0,
                pitch,
                roll: 0.0,
            },
            timestamp: 0.0,
        }
    }

    #[test]
    fn ges_horizon_and_nadir_map_to_dji() {
        assert_eq!(PitchMapper::map_pitch(90.0, PitchConvention::Ges).unwrap(), 0.0);
        assert_eq!(PitchMapper::map_pitch(0.0, PitchConvention::Ges).unwrap(), -90.0);
        assert_eq!(PitchMapper::map_pitch(60.0, PitchConvention::Ges).unwrap(), -30.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(PitchMapper::map_pitch(120.0, PitchConvention::Ges).unwrap(), 0.0);
        assert_eq!(PitchMapper::map_pitch(-120.0, PitchConvention::Dji).unwrap(), -90.0);
        assert_eq!(PitchMapper::map_pitch(30.0, PitchConvention::Dji).unwrap(), 0.0);
    }

    #[test]
    fn insane_values_are_rejected() {
        assert!(PitchMapper::map_pitch(200.0, PitchConvention::Ges).is_err());
        assert!(PitchMapper::map_pitch(-181.0, PitchConvention::Dji).is_err());
        assert!(PitchMapper::map_pitch(f64::NAN, PitchConvention::Dji).is_err());
    }

    #[test]
    fn fixed_mode_ignores_source_pitch() {
        let mapper = PitchMapper::new(PitchMode::Fixed { pitch_deg: -30.0 });
        let frames = vec![frame_with_pitch(10.0), frame_with_pitch(80.0)];
        assert_eq!(mapper.resolve(&frames).unwrap(), vec![-30.0, -30.0]);
    }

    #[test]
    fn from_source_mode_maps_each_frame() {
        let mapper = PitchMapper::new(PitchMode::FromSource);
        let frames = vec![frame_with_pitch(90.0), frame_with_pitch(45.0)];
        assert_eq!(mapper.resolve(&frames).unwrap(), vec![0.0, -45.0]);
    }

    proptest! {
        #[test]
        fn ges_pitch_in_quarter_turn_stays_in_gimbal_range(pitch in 0.0f64..=90.0) {
            let mapped = PitchMapper::map_pitch(pitch, PitchConvention::Ges).unwrap();
            prop_assert!((MIN_GIMBAL_PITCH..=MAX_GIMBAL_PITCH).contains(&mapped));
        }
    }
}
