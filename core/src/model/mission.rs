use crate::model::waypoint::Waypoint;
use crate::prelude::MissionResult;
use crate::processing::metrics::{MetricsEstimator, MissionMetrics};
use serde::Serialize;

/// Ordered, merged waypoint list with its derived distance and duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mission {
    waypoints: Vec<Waypoint>,
    cruise_speed_m_s: f64,
    metrics: MissionMetrics,
}

impl Mission {
    pub(crate) fn new(waypoints: Vec<Waypoint>, cruise_speed_m_s: f64) -> MissionResult<Self> {
        let metrics = MetricsEstimator::new().estimate_waypoints(&waypoints, cruise_speed_m_s)?;
        Ok(Self {
            waypoints,
            cruise_speed_m_s,
            metrics,
        })
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn cruise_speed_m_s(&self) -> f64 {
        self.cruise_speed_m_s
    }

    pub fn metrics(&self) -> MissionMetrics {
        self.metrics
    }

    pub fn total_distance_m(&self) -> f64 {
        self.metrics.total_distance_m
    }

    pub fn estimated_duration_s(&self) -> f64 {
        self.metrics.estimated_duration_s
    }

    /// Appends waypoints at the end and recomputes the metrics.
    pub fn append(&mut self, waypoints: impl IntoIterator<Item = Waypoint>) -> MissionResult<()> {
        self.waypoints.extend(waypoints);
        self.metrics =
            MetricsEstimator::new().estimate_waypoints(&self.waypoints, self.cruise_speed_m_s)?;
        Ok(())
    }
}
