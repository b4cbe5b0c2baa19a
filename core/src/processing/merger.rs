use crate::model::{Mission, Waypoint};
use crate::prelude::{MissionError, MissionResult, Stage};
use crate::telemetry::log::LogManager;

/// Waypoints built from one source file, tagged with the operator's selection order.
#[derive(Debug, Clone, PartialEq)]
pub struct FileWaypoints {
    pub file_id: String,
    pub selection_order: usize,
    pub waypoints: Vec<Waypoint>,
}

/// Concatenates per-file waypoint lists into one mission.
pub struct MissionMerger {
    cruise_speed_m_s: f64,
    logger: LogManager,
}

impl MissionMerger {
    pub fn new(cruise_speed_m_s: f64) -> Self {
        Self {
            cruise_speed_m_s,
            logger: LogManager::new(Stage::Merge),
        }
    }

    /// Joins files in selection order without reordering or deduplicating waypoints.
    pub fn merge(&self, mut files: Vec<FileWaypoints>) -> MissionResult<Mission> {
        if files.iter().all(|file| file.waypoints.is_empty()) {
            return Err(MissionError::EmptyMission);
        }
        files.sort_by_key(|file| file.selection_order);

        for (ending, starting) in boundary_duplicates(&files) {
            self.logger.warn(&format!(
                "'{}' ends where '{}' starts; keeping the zero-length leg",
                ending, starting
            ));
        }

        let file_count = files.len();
        let waypoints: Vec<Waypoint> = files
            .into_iter()
            .flat_map(|file| file.waypoints)
            .collect();
        let mission = Mission::new(waypoints, self.cruise_speed_m_s)?;

        self.logger.record(&format!(
            "{} files -> {} waypoints, {:.1} m",
            file_count,
            mission.len(),
            mission.total_distance_m()
        ));
        Ok(mission)
    }
}

/// Consecutive non-empty files (already in flight order) whose boundary waypoints coincide.
fn boundary_duplicates(files: &[FileWaypoints]) -> Vec<(&str, &str)> {
    let mut duplicates = Vec::new();
    let mut previous: Option<(&str, &Waypoint)> = None;
    for file in files {
        let (Some(first), Some(last)) = (file.waypoints.first(), file.waypoints.last()) else {
            continue;
        };
        if let Some((ending, tail)) = previous {
            if tail.same_position(first) {
                duplicates.push((ending, file.file_id.as_str()));
            }
        }
        previous = Some((file.file_id.as_str(), last));
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AltitudeType;
    use crate::processing::metrics::MetricsEstimator;

    fn waypoints(file: &str, start: f64, count: usize) -> Vec<Waypoint> {
        (0..count)
            .map(|i| Waypoint {
                latitude: start + i as f64 * 1e-4,
                longitude: 4.0,
                altitude: 50.0,
                altitude_type: AltitudeType::Wgs84,
                heading: 0.0,
                gimbal_pitch: -30.0,
                speed_m_s: 5.0,
                source_file: file.into(),
                actions: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn merge_concatenates_in_selection_order() {
        let a = waypoints("a.json", 52.0, 3);
        let b = waypoints("b.json", 53.0, 2);
        let files = vec![
            FileWaypoints {
                file_id: "b.json".into(),
                selection_order: 1,
                waypoints: b.clone(),
            },
            FileWaypoints {
                file_id: "a.json".into(),
                selection_order: 0,
                waypoints: a.clone(),
            },
        ];

        let mission = MissionMerger::new(5.0).merge(files).unwrap();
        let expected: Vec<Waypoint> = a.into_iter().chain(b).collect();
        assert_eq!(mission.waypoints(), expected.as_slice());
        assert!(mission.total_distance_m() > 0.0);
    }

    #[test]
    fn merge_keeps_duplicate_boundary_waypoints() {
        let a = waypoints("a.json", 52.0, 2);
        let mut b = waypoints("b.json", 52.5, 2);
        b[0] = Waypoint {
            source_file: "b.json".into(),
            ..a[1].clone()
        };
        let files = vec![
            FileWaypoints {
                file_id: "a.json".into(),
                selection_order: 0,
                waypoints: a,
            },
            FileWaypoints {
                file_id: "b.json".into(),
                selection_order: 1,
                waypoints: b,
            },
        ];
        let mission = MissionMerger::new(5.0).merge(files).unwrap();
        assert_eq!(mission.len(), 4);
        assert!(mission.waypoints()[1].same_position(&mission.waypoints()[2]));
    }

    #[test]
    fn boundary_check_skips_files_without_waypoints() {
        let a = waypoints("a.json", 52.0, 2);
        let mut c = waypoints("c.json", 52.5, 2);
        c[0] = Waypoint {
            source_file: "c.json".into(),
            ..a[1].clone()
        };
        let files = vec![
            FileWaypoints {
                file_id: "a.json".into(),
                selection_order: 0,
                waypoints: a,
            },
            FileWaypoints {
                file_id: "b.json".into(),
                selection_order: 1,
                waypoints: Vec::new(),
            },
            FileWaypoints {
                file_id: "c.json".into(),
                selection_order: 2,
                waypoints: c,
            },
        ];
        assert_eq!(boundary_duplicates(&files), vec![("a.json", "c.json")]);

        let mission = MissionMerger::new(5.0).merge(files).unwrap();
        assert_eq!(mission.len(), 4);
    }

    #[test]
    fn merge_without_waypoints_fails() {
        let merger = MissionMerger::new(5.0);
        assert_eq!(merger.merge(Vec::new()), Err(MissionError::EmptyMission));
        let empty = FileWaypoints {
            file_id: "a.json".into(),
            selection_order: 0,
            waypoints: Vec::new(),
        };
        assert_eq!(merger.merge(vec![empty]), Err(MissionError::EmptyMission));
    }

    #[test]
    fn append_recomputes_metrics() {
        let files = vec![FileWaypoints {
            file_id: "a.json".into(),
            selection_order: 0,
            waypoints: waypoints("a.json", 52.0, 1),
        }];
        let mut mission = MissionMerger::new(5.0).merge(files).unwrap();
        assert_eq!(mission.total_distance_m(), 0.0);

        mission.append(waypoints("b.json", 52.001, 1)).unwrap();
        assert_eq!(mission.len(), 2);
        assert!(mission.total_distance_m() > 100.0);
        assert!((mission.estimated_duration_s() - mission.total_distance_m() / 5.0).abs() < 1e-9);
        let recomputed = MetricsEstimator::new().estimate(&mission, 5.0).unwrap();
        assert_eq!(mission.metrics(), recomputed);
    }
}
