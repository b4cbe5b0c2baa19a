use crate::model::{AltitudeType, GeoFrame, Orientation};
use crate::prelude::{MissionError, MissionResult, Stage};
use serde::{Deserialize, Serialize};

/// Frame rate assumed when an export carries neither `frameRate` nor per-frame times.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Geographic position of a camera sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GesCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// Camera rotation as exported: `x` is the tilt (90 = horizon), `y` the yaw, `z` the roll.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GesRotation {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// One entry of the `cameraFrames` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GesCameraFrame {
    pub coordinate: GesCoordinate,
    pub rotation: GesRotation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov_vertical: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

/// Camera-animation export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GesDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_frames: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    pub camera_frames: Vec<GesCameraFrame>,
}

impl GesDocument {
    pub fn from_json_str(contents: &str) -> MissionResult<Self> {
        let document: GesDocument = serde_json::from_str(contents)
            .map_err(|err| MissionError::invalid(Stage::Source, err.to_string()))?;
        if document.camera_frames.is_empty() {
            return Err(MissionError::invalid(
                Stage::Source,
                "'cameraFrames' list is empty",
            ));
        }
        Ok(document)
    }

    fn frame_rate(&self) -> MissionResult<f64> {
        let rate = self.frame_rate.unwrap_or(DEFAULT_FRAME_RATE);
        if rate.is_finite() && rate > 0.0 {
            Ok(rate)
        } else {
            Err(MissionError::invalid(
                Stage::Source,
                format!("frame rate {} must be positive", rate),
            ))
        }
    }

    /// Field of view of the first sample, if the export recorded one.
    pub fn field_of_view(&self) -> Option<f64> {
        self.camera_frames.first().and_then(|frame| frame.fov_vertical)
    }

    /// Converts the camera samples into validated `GeoFrame`s.
    pub fn to_geo_frames(&self, altitude_type: AltitudeType) -> MissionResult<Vec<GeoFrame>> {
        let frame_rate = self.frame_rate()?;
        let frames: Vec<GeoFrame> = self
            .camera_frames
            .iter()
            .enumerate()
            .map(|(index, sample)| GeoFrame {
                sequence_index: index,
                latitude: sample.coordinate.latitude,
                longitude: sample.coordinate.longitude,
                altitude: sample.coordinate.altitude,
                altitude_type,
                orientation: Orientation {
                    yaw: sample.rotation.y,
                    pitch: sample.rotation.x,
                    roll: sample.rotation.z,
                },
                timestamp: sample.time.unwrap_or(index as f64 / frame_rate),
            })
            .collect();

        if let Some(bad) = frames
            .iter()
            .find(|f| !(f.latitude.is_finite() && f.longitude.is_finite() && f.altitude.is_finite()))
        {
            return Err(MissionError::invalid(
                Stage::Source,
                format!("frame {} has a non-finite coordinate", bad.sequence_index),
            ));
        }

        GeoFrame::validate_sequence(&frames)?;
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "frameRate": 10,
        "numFrames": 2,
        "cameraFrames": [
            { "coordinate": { "latitude": 52.0, "longitude": 4.0, "altitude": 120.0 },
              "rotation": { "x": 60.0, "y": 180.0, "z": 1.0 },
              "fovVertical": 45.0 },
            { "coordinate": { "latitude": 52.001, "longitude": 4.0, "altitude": 121.0 },
              "rotation": { "x": 70.0, "y": 190.0, "z": 0.0 } }
        ]
    }"#;

    #[test]
    fn document_converts_to_geo_frames() {
        let document = GesDocument::from_json_str(SAMPLE).unwrap();
        assert_eq!(document.field_of_view(), Some(45.0));

        let frames = document.to_geo_frames(AltitudeType::Wgs84).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].sequence_index, 1);
        assert!((frames[1].timestamp - 0.1).abs() < 1e-12);
        assert_eq!(frames[0].orientation.pitch, 60.0);
        assert_eq!(frames[0].orientation.yaw, 180.0);
        assert_eq!(frames[0].orientation.roll, 1.0);
    }

    #[test]
    fn missing_camera_frames_is_rejected() {
        let err = GesDocument::from_json_str(r#"{ "frameRate": 30 }"#).unwrap_err();
        assert_eq!(err.stage(), Stage::Source);
    }

    #[test]
    fn empty_camera_frames_is_rejected() {
        let err = GesDocument::from_json_str(r#"{ "cameraFrames": [] }"#).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn explicit_times_must_not_go_backwards() {
        let json = r#"{ "cameraFrames": [
            { "coordinate": { "latitude": 0, "longitude": 0, "altitude": 0 },
              "rotation": { "x": 0, "y": 0, "z": 0 }, "time": 2.0 },
            { "coordinate": { "latitude": 0, "longitude": 0, "altitude": 0 },
              "rotation": { "x": 0, "y": 0, "z": 0 }, "time": 1.0 } ] }"#;
        let document = GesDocument::from_json_str(json).unwrap();
        assert!(document.to_geo_frames(AltitudeType::Wgs84).is_err());
    }
}
