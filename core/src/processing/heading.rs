use crate::math::{haversine_distance, initial_bearing, normalize_360};
use crate::model::{GeoFrame, PointOfInterest};
use crate::prelude::{MissionError, MissionResult, Stage};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// How waypoint headings are derived; chosen once per mission.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HeadingMode {
    /// Carry the source yaw through, normalized to a compass bearing.
    #[default]
    PassThrough,
    /// Face the file's point of interest from every waypoint.
    PointAtPoi,
    /// Hold one operator-supplied heading, given in `[-180, 180]`.
    Fixed { heading_deg: f64 },
    /// Face the next waypoint along the path.
    FollowCourse,
}

impl HeadingMode {
    pub fn requires_poi(&self) -> bool {
        matches!(self, HeadingMode::PointAtPoi)
    }
}

pub struct HeadingSolver {
    mode: HeadingMode,
    logger: LogManager,
}

impl HeadingSolver {
    pub fn new(mode: HeadingMode) -> MissionResult<Self> {
        if let HeadingMode::Fixed { heading_deg } = mode {
            if !(-180.0..=180.0).contains(&heading_deg) {
                return Err(MissionError::invalid(
                    Stage::Heading,
                    format!("fixed heading {} outside [-180, 180]", heading_deg),
                ));
            }
        }
        Ok(Self {
            mode,
            logger: LogManager::new(Stage::Heading),
        })
    }

    /// Bearing in `[0, 360)` from a position to the point of interest.
    pub fn bearing_to_poi(latitude: f64, longitude: f64, poi: &PointOfInterest) -> f64 {
        initial_bearing(latitude, longitude, poi.latitude, poi.longitude)
    }

    /// One heading per frame, each in `[0, 360)`.
    pub fn solve(
        &self,
        frames: &[GeoFrame],
        poi: Option<&PointOfInterest>,
    ) -> MissionResult<Vec<f64>> {
        let headings = match self.mode {
            HeadingMode::PassThrough => frames
                .iter()
                .map(|frame| normalize_360(frame.orientation.yaw))
                .collect(),
            HeadingMode::PointAtPoi => {
                let poi = poi.ok_or_else(|| MissionError::MissingPoi {
                    file: String::new(),
                })?;
                frames
                    .iter()
                    .map(|frame| Self::bearing_to_poi(frame.latitude, frame.longitude, poi))
                    .collect()
            }
            HeadingMode::Fixed { heading_deg } => vec![normalize_360(heading_deg); frames.len()],
            HeadingMode::FollowCourse => Self::course_headings(frames),
        };

        self.logger.detail(&format!(
            "{:?} resolved {} headings",
            self.mode,
            frames.len()
        ));
        Ok(headings)
    }

    fn course_headings(frames: &[GeoFrame]) -> Vec<f64> {
        let mut headings = Vec::with_capacity(frames.len());
        let mut previous = 0.0;
        for pair in frames.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            // zero-length legs have no direction of their own
            if haversine_distance(from.latitude, from.longitude, to.latitude, to.longitude) > 0.0 {
                previous = initial_bearing(from.latitude, from.longitude, to.latitude, to.longitude);
            }
            headings.push(previous);
        }
        if !frames.is_empty() {
            headings.push(previous);
        }
        headings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::destination;
    use crate::model::{AltitudeType, Orientation};

    fn frame_at(latitude: f64, longitude: f64, yaw: f64) -> GeoFrame {
        GeoFrame {
            sequence_index: 0,
            latitude,
            longitude,
            altitude: 30.0,
            altitude_type: AltitudeType::Wgs84,
            orientation: Orientation {
                yaw,
                pitch: 90.0,
                roll: 0.0,
            },
            timestamp: 0.0,
        }
    }

    #[test]
    fn pass_through_normalizes_yaw() {
        let solver = HeadingSolver::new(HeadingMode::PassThrough).unwrap();
        let frames = vec![frame_at(0.0, 0.0, -90.0), frame_at(0.0, 0.0, 370.0)];
        assert_eq!(solver.solve(&frames, None).unwrap(), vec![270.0, 10.0]);
    }

    #[test]
    fn point_at_poi_faces_the_poi() {
        let poi = PointOfInterest::new(47.0, 8.0);
        let (south_lat, south_lon) = destination(47.0, 8.0, 180.0, 100.0);
        let (east_lat, east_lon) = destination(47.0, 8.0, 90.0, 100.0);
        let frames = vec![
            frame_at(south_lat, south_lon, 0.0),
            frame_at(east_lat, east_lon, 0.0),
        ];

        let solver = HeadingSolver::new(HeadingMode::PointAtPoi).unwrap();
        let headings = solver.solve(&frames, Some(&poi)).unwrap();
        assert!(headings[0] < 1e-6 || headings[0] > 360.0 - 1e-6);
        assert!((headings[1] - 270.0).abs() < 0.01);
        assert!(headings.iter().all(|h| (0.0..360.0).contains(h)));
    }

    #[test]
    fn point_at_poi_without_poi_fails() {
        let solver = HeadingSolver::new(HeadingMode::PointAtPoi).unwrap();
        let err = solver.solve(&[frame_at(0.0, 0.0, 0.0)], None).unwrap_err();
        assert!(matches!(err, MissionError::MissingPoi { .. }));
    }

    #[test]
    fn fixed_heading_is_validated_and_normalized() {
        assert!(HeadingSolver::new(HeadingMode::Fixed { heading_deg: 181.0 }).is_err());
        let solver = HeadingSolver::new(HeadingMode::Fixed { heading_deg: -45.0 }).unwrap();
        let frames = vec![frame_at(0.0, 0.0, 0.0); 3];
        assert_eq!(solver.solve(&frames, None).unwrap(), vec![315.0; 3]);
    }

    #[test]
    fn follow_course_faces_next_waypoint() {
        let (north_lat, north_lon) = destination(0.0, 0.0, 0.0, 100.0);
        let (east_lat, east_lon) = destination(north_lat, north_lon, 90.0, 100.0);
        let frames = vec![
            frame_at(0.0, 0.0, 0.0),
            frame_at(north_lat, north_lon, 0.0),
            frame_at(north_lat, north_lon, 0.0),
            frame_at(east_lat, east_lon, 0.0),
        ];
        let solver = HeadingSolver::new(HeadingMode::FollowCourse).unwrap();
        let headings = solver.solve(&frames, None).unwrap();
        assert_eq!(headings.len(), 4);
        assert!(headings[0].abs() < 1e-6);
        assert!(headings[1].abs() < 1e-6);
        assert!((headings[2] - 90.0).abs() < 0.01);
        assert!((headings[3] - 90.0).abs() < 0.01);
    }

    #[test]
    fn heading_mode_reads_tagged_config() {
        let mode: HeadingMode =
            serde_json::from_str(r#"{ "mode": "fixed", "heading_deg": 12.5 }"#).unwrap();
        assert_eq!(mode, HeadingMode::Fixed { heading_deg: 12.5 });
        let mode: HeadingMode = serde_json::from_str(r#"{ "mode": "point_at_poi" }"#).unwrap();
        assert!(mode.requires_poi());
    }
}
