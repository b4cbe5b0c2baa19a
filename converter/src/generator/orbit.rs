use anyhow::{bail, Context};
use missioncore::ges_interface::{GesCameraFrame, GesCoordinate, GesDocument, GesRotation};
use missioncore::math::{destination, normalize_360};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for generating a synthetic orbit animation around a centre point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub radius_m: f64,
    pub altitude_m: f64,
    pub frame_count: usize,
    pub frame_rate: f64,
    pub start_bearing_deg: f64,
    pub sweep_deg: f64,
    pub clockwise: bool,
    pub tilt_deg: f64,
    pub fov_vertical: f64,
    pub jitter_m: f64,
    pub seed: u64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            center_latitude: 52.37,
            center_longitude: 4.89,
            radius_m: 150.0,
            altitude_m: 120.0,
            frame_count: 240,
            frame_rate: 30.0,
            start_bearing_deg: 0.0,
            sweep_deg: 360.0,
            clockwise: true,
            tilt_deg: 60.0,
            fov_vertical: 45.0,
            jitter_m: 0.0,
            seed: 0,
        }
    }
}

impl OrbitConfig {
    /// Reads orbit parameters from YAML; omitted keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading orbit config {}", path_ref.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing orbit config {}", path_ref.display()))
    }

    /// Bearing from the centre to frame `index`.
    pub fn bearing_of(&self, index: usize) -> f64 {
        let step = self.sweep_deg / self.frame_count.max(1) as f64;
        let direction = if self.clockwise { 1.0 } else { -1.0 };
        normalize_360(self.start_bearing_deg + direction * step * index as f64)
    }
}

/// Builds a GES-style document whose camera circles the centre while facing it.
pub fn build_orbit_document(config: &OrbitConfig) -> anyhow::Result<GesDocument> {
    if config.frame_count == 0 {
        bail!("orbit needs at least one frame");
    }
    if !(config.frame_rate > 0.0) {
        bail!("orbit frame rate must be positive, got {}", config.frame_rate);
    }
    if !(config.radius_m >= 0.0) || !(config.jitter_m >= 0.0) {
        bail!("orbit radius and jitter must be non-negative");
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let jitter = |rng: &mut StdRng| {
        if config.jitter_m > 0.0 {
            rng.gen_range(-config.jitter_m..config.jitter_m)
        } else {
            0.0
        }
    };

    let camera_frames = (0..config.frame_count)
        .map(|index| {
            let bearing = config.bearing_of(index);
            let radius = config.radius_m + jitter(&mut rng);
            let (latitude, longitude) = destination(
                config.center_latitude,
                config.center_longitude,
                bearing,
                radius,
            );
            GesCameraFrame {
                coordinate: GesCoordinate {
                    latitude,
                    longitude,
                    altitude: config.altitude_m + jitter(&mut rng),
                },
                rotation: GesRotation {
                    x: config.tilt_deg,
                    y: normalize_360(bearing + 180.0),
                    z: 0.0,
                },
                fov_vertical: Some(config.fov_vertical),
                time: Some(index as f64 / config.frame_rate),
            }
        })
        .collect();

    Ok(GesDocument {
        frame_rate: Some(config.frame_rate),
        num_frames: Some(config.frame_count),
        duration_seconds: Some(config.frame_count as f64 / config.frame_rate),
        camera_frames,
    })
}

pub fn write_orbit_document<P: AsRef<Path>>(path: P, config: &OrbitConfig) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    let document = build_orbit_document(config)?;
    let json = serde_json::to_string_pretty(&document).context("serializing orbit document")?;
    fs::write(path_ref, json)
        .with_context(|| format!("writing orbit document {}", path_ref.display()))
}
