use crate::math::haversine_distance;
use crate::model::{Mission, Waypoint};
use crate::prelude::{MissionError, MissionResult, Stage};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// Path length and flight-time estimate of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MissionMetrics {
    pub total_distance_m: f64,
    pub estimated_duration_s: f64,
}

pub struct MetricsEstimator {
    logger: LogManager,
}

impl MetricsEstimator {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(Stage::Metrics),
        }
    }

    /// Straight-line 3D length of one leg: great-circle horizontal plus altitude change.
    pub fn segment_distance(from: &Waypoint, to: &Waypoint) -> f64 {
        let horizontal = haversine_distance(from.latitude, from.longitude, to.latitude, to.longitude);
        let vertical = to.altitude - from.altitude;
        horizontal.hypot(vertical)
    }

    pub fn estimate(&self, mission: &Mission, cruise_speed_m_s: f64) -> MissionResult<MissionMetrics> {
        self.estimate_waypoints(mission.waypoints(), cruise_speed_m_s)
    }

    pub fn estimate_waypoints(
        &self,
        waypoints: &[Waypoint],
        cruise_speed_m_s: f64,
    ) -> MissionResult<MissionMetrics> {
        if !(cruise_speed_m_s.is_finite() && cruise_speed_m_s > 0.0) {
            return Err(MissionError::invalid(
                Stage::Metrics,
                format!("cruise speed {} must be positive", cruise_speed_m_s),
            ));
        }

        let total_distance_m: f64 = waypoints
            .windows(2)
            .map(|pair| Self::segment_distance(&pair[0], &pair[1]))
            .sum();
        let metrics = MissionMetrics {
            total_distance_m,
            estimated_duration_s: total_distance_m / cruise_speed_m_s,
        };

        self.logger.detail(&format!(
            "{} waypoints, {:.1} m, {}",
            waypoints.len(),
            metrics.total_distance_m,
            format_duration(metrics.estimated_duration_s)
        ));
        Ok(metrics)
    }
}

impl Default for MetricsEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders seconds as `MM:SS`; negative or non-finite input yields `N/A`.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "N/A".to_string();
    }
    let whole = seconds as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}
