use crate::workflow::runner::{FileSummary, WorkflowResult};
use anyhow::Context;
use missioncore::processing::format_duration;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Human-readable mission summary, printed and optionally written as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct MissionSummary {
    pub waypoint_count: usize,
    pub total_distance_m: f64,
    pub estimated_duration_s: f64,
    pub duration: String,
    pub cruise_speed_m_s: f64,
    pub files: Vec<FileSummary>,
}

impl MissionSummary {
    pub fn from_result(result: &WorkflowResult) -> Self {
        let mission = &result.mission;
        let metrics = mission.metrics();
        Self {
            waypoint_count: mission.len(),
            total_distance_m: metrics.total_distance_m,
            estimated_duration_s: metrics.estimated_duration_s,
            duration: format_duration(metrics.estimated_duration_s),
            cruise_speed_m_s: mission.cruise_speed_m_s(),
            files: result.files.clone(),
        }
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path_ref = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("serializing mission summary")?;
        fs::write(path_ref, json)
            .with_context(|| format!("writing mission summary {}", path_ref.display()))
    }
}

impl fmt::Display for MissionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "waypoints={} files={} distance={:.1}m duration={} ({:.1}s @ {} m/s)",
            self.waypoint_count,
            self.files.len(),
            self.total_distance_m,
            self.duration,
            self.estimated_duration_s,
            self.cruise_speed_m_s
        )
    }
}
