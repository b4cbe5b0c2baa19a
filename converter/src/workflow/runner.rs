use crate::workflow::config::WorkflowConfig;
use crate::workflow::source::LoadedSource;
use anyhow::Context;
use missioncore::model::{GeoFrame, Mission, Waypoint};
use missioncore::processing::{
    format_duration, FileWaypoints, MetricsEstimator, MissionBuilder, MissionMerger, Thinner,
};
use serde::Serialize;

/// Per-file outcome of a run, also used for previews.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub file_id: String,
    pub selection_order: usize,
    pub frames_loaded: usize,
    pub waypoints: usize,
    pub distance_m: f64,
    pub duration_s: f64,
    pub field_of_view: Option<f64>,
}

impl FileSummary {
    pub fn describe(&self) -> String {
        format!(
            "{}: {} frames -> {} waypoints, {:.1} m, {}",
            self.file_id,
            self.frames_loaded,
            self.waypoints,
            self.distance_m,
            format_duration(self.duration_s)
        )
    }
}

pub struct WorkflowResult {
    pub mission: Mission,
    pub files: Vec<FileSummary>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Thins and builds every source in selection order, then merges them into one mission.
    pub fn execute(&self, sources: &[LoadedSource]) -> anyhow::Result<WorkflowResult> {
        let builder = MissionBuilder::new(self.config.to_build_settings())
            .context("configuring mission builder")?;
        let thinner = Thinner::new();

        let mut files = Vec::with_capacity(sources.len());
        let mut summaries = Vec::with_capacity(sources.len());
        for source in sources {
            let waypoints = self.build_file(&thinner, &builder, source)?;
            summaries.push(self.summarize(source, &waypoints)?);
            files.push(FileWaypoints {
                file_id: source.id.clone(),
                selection_order: source.selection_order,
                waypoints,
            });
        }
        summaries.sort_by_key(|summary| summary.selection_order);

        let mission = MissionMerger::new(self.config.cruise_speed_m_s)
            .merge(files)
            .context("merging mission")?;

        Ok(WorkflowResult {
            mission,
            files: summaries,
        })
    }

    /// Runs one file through thinning and building without merging.
    pub fn preview(&self, source: &LoadedSource) -> anyhow::Result<FileSummary> {
        let builder = MissionBuilder::new(self.config.to_build_settings())
            .context("configuring mission builder")?;
        let waypoints = self.build_file(&Thinner::new(), &builder, source)?;
        self.summarize(source, &waypoints)
    }

    fn thin(&self, thinner: &Thinner, source: &LoadedSource) -> anyhow::Result<Vec<GeoFrame>> {
        match self.config.waypoints {
            Some(target) => thinner
                .thin(source.frames.clone(), target)
                .map_err(|err| err.in_file(&source.id))
                .with_context(|| format!("thinning {}", source.id)),
            None => Ok(source.frames.clone()),
        }
    }

    fn build_file(
        &self,
        thinner: &Thinner,
        builder: &MissionBuilder,
        source: &LoadedSource,
    ) -> anyhow::Result<Vec<Waypoint>> {
        let frames = self.thin(thinner, source)?;
        builder
            .build(&source.id, &frames, source.poi.as_ref())
            .with_context(|| format!("building waypoints for {}", source.id))
    }

    fn summarize(&self, source: &LoadedSource, waypoints: &[Waypoint]) -> anyhow::Result<FileSummary> {
        let metrics = MetricsEstimator::new()
            .estimate_waypoints(waypoints, self.config.cruise_speed_m_s)
            .with_context(|| format!("estimating metrics for {}", source.id))?;
        Ok(FileSummary {
            file_id: source.id.clone(),
            selection_order: source.selection_order,
            frames_loaded: source.frames.len(),
            waypoints: waypoints.len(),
            distance_m: metrics.total_distance_m,
            duration_s: metrics.estimated_duration_s,
            field_of_view: source.field_of_view,
        })
    }
}
