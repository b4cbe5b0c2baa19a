use crate::export::MissionSettings;
use anyhow::{bail, Context};
use missioncore::model::{AltitudeType, PointOfInterest};
use missioncore::processing::{BuildSettings, HeadingMode, PitchMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SPEED_M_S: f64 = 12.0;

/// One selected source animation and its optional point of interest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub path: PathBuf,
    #[serde(default)]
    pub poi: Option<PointOfInterest>,
}

/// Operator configuration for one conversion run. `sources` is in selection order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub sources: Vec<SourceSpec>,
    pub waypoints: Option<usize>,
    pub cruise_speed_m_s: f64,
    pub waypoint_speed_m_s: f64,
    pub altitude_type: AltitudeType,
    pub heading: HeadingMode,
    pub pitch: PitchMode,
    pub mission: MissionSettings,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            waypoints: None,
            cruise_speed_m_s: DEFAULT_SPEED_M_S,
            waypoint_speed_m_s: DEFAULT_SPEED_M_S,
            altitude_type: AltitudeType::default(),
            heading: HeadingMode::default(),
            pitch: PitchMode::default(),
            mission: MissionSettings::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let mut config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;

        // source paths are relative to the workflow file
        if let Some(base) = path_ref.parent() {
            for source in &mut config.sources {
                if source.path.is_relative() {
                    source.path = base.join(&source.path);
                }
            }
        }
        Ok(config)
    }

    pub fn from_sources(sources: Vec<SourceSpec>) -> Self {
        Self {
            sources,
            ..Default::default()
        }
    }

    /// Rejects settings the pipeline cannot run with, naming every offending source.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.sources.is_empty() {
            bail!("no source files selected");
        }
        if !(self.cruise_speed_m_s > 0.0) {
            bail!("cruise speed must be positive, got {}", self.cruise_speed_m_s);
        }
        if !(self.waypoint_speed_m_s > 0.0) {
            bail!("waypoint speed must be positive, got {}", self.waypoint_speed_m_s);
        }
        if !(self.mission.transitional_speed_m_s > 0.0) {
            bail!(
                "transitional speed must be positive, got {}",
                self.mission.transitional_speed_m_s
            );
        }
        if !(self.mission.turn_damping_m >= 0.0) {
            bail!(
                "turn damping must be non-negative, got {}",
                self.mission.turn_damping_m
            );
        }
        if let Some(target) = self.waypoints {
            if target < 2 {
                bail!("desired waypoint count must be at least 2, got {}", target);
            }
        }
        if let HeadingMode::Fixed { heading_deg } = self.heading {
            if !(-180.0..=180.0).contains(&heading_deg) {
                bail!("manual heading must be between -180 and 180, got {}", heading_deg);
            }
        }
        if self.heading.requires_poi() {
            let missing: Vec<String> = self
                .sources
                .iter()
                .filter(|source| source.poi.is_none())
                .map(|source| source.path.display().to_string())
                .collect();
            if !missing.is_empty() {
                bail!(
                    "a POI must be set for every file when pointing at POIs; missing for:\n - {}",
                    missing.join("\n - ")
                );
            }
        }
        Ok(())
    }

    pub fn to_build_settings(&self) -> BuildSettings {
        BuildSettings {
            altitude_type: self.altitude_type,
            heading: self.heading,
            pitch: self.pitch,
            waypoint_speed_m_s: self.waypoint_speed_m_s,
        }
    }
}

/// Parses `lat,lon` or `lat,lon,alt`.
pub fn parse_poi(value: &str) -> anyhow::Result<PointOfInterest> {
    let parts = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid POI component '{}' in '{}'", part, value))
        })
        .collect::<anyhow::Result<Vec<f64>>>()?;
    let poi = match parts.as_slice() {
        [latitude, longitude] => PointOfInterest::new(*latitude, *longitude),
        [latitude, longitude, altitude] => PointOfInterest {
            latitude: *latitude,
            longitude: *longitude,
            altitude: *altitude,
        },
        _ => bail!("POI '{}' must be 'lat,lon' or 'lat,lon,alt'", value),
    };
    if !(-90.0..=90.0).contains(&poi.latitude) || !(-180.0..=180.0).contains(&poi.longitude) {
        bail!("POI '{}' is outside valid latitude/longitude ranges", value);
    }
    Ok(poi)
}
