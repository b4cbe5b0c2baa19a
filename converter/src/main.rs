use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use export::{render_template, render_waylines, write_kmz, KmzContents, MissionSummary};
use generator::orbit::{write_orbit_document, OrbitConfig};
use log::info;
use missioncore::model::AltitudeType;
use missioncore::processing::{HeadingMode, PitchMode};
use std::fs;
use std::path::PathBuf;
use workflow::config::{parse_poi, SourceSpec, WorkflowConfig, DEFAULT_SPEED_M_S};
use workflow::runner::Runner;
use workflow::source::load_sources;

mod export;
mod generator;
mod workflow;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HeadingArg {
    PassThrough,
    PointAtPoi,
    Fixed,
    FollowCourse,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PitchArg {
    Fixed,
    FromSource,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AltitudeArg {
    Wgs84,
    Relative,
}

#[derive(Parser)]
#[command(author, version, about = "Convert GES camera animations into DJI waypoint missions")]
struct Args {
    /// Load the full conversion setup from YAML (overrides the per-run flags below)
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// GES JSON export; repeat for several files, in the order they should be flown
    #[arg(long = "input")]
    inputs: Vec<PathBuf>,
    /// Point of interest for the input at the same position, as `lat,lon[,alt]` or `-` for none
    #[arg(long = "poi", allow_hyphen_values = true)]
    pois: Vec<String>,
    /// Output KMZ mission
    #[arg(long)]
    output: Option<PathBuf>,
    /// Existing template.kml to embed instead of the generated default
    #[arg(long)]
    reference_template: Option<PathBuf>,
    /// Also write the mission summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,
    /// Thin each file to this many waypoints
    #[arg(long)]
    waypoints: Option<usize>,
    /// Cruise speed used for the flight-time estimate and autoFlightSpeed (m/s)
    #[arg(long, default_value_t = DEFAULT_SPEED_M_S)]
    speed: f64,
    #[arg(long, value_enum, default_value_t = AltitudeArg::Wgs84)]
    altitude_type: AltitudeArg,
    #[arg(long, value_enum, default_value_t = HeadingArg::PassThrough)]
    heading_mode: HeadingArg,
    /// Heading in [-180, 180] for `--heading-mode fixed`
    #[arg(long, allow_hyphen_values = true)]
    heading_angle: Option<f64>,
    #[arg(long, value_enum, default_value_t = PitchArg::Fixed)]
    pitch_mode: PitchArg,
    /// Gimbal pitch for `--pitch-mode fixed` (0 = horizon, -90 = down)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    fixed_pitch: f64,
    /// Print per-file waypoint counts, distance and duration without writing a mission
    #[arg(long, default_value_t = false)]
    preview: bool,
    /// Write a synthetic orbit animation to this path
    #[arg(long)]
    generate_orbit: Option<PathBuf>,
    /// YAML orbit parameters for `--generate-orbit` (defaults when omitted)
    #[arg(long, requires = "generate_orbit")]
    orbit_config: Option<PathBuf>,
}

impl Args {
    fn to_workflow_config(&self) -> anyhow::Result<WorkflowConfig> {
        if self.pois.len() > self.inputs.len() {
            bail!(
                "{} POIs given for {} input files",
                self.pois.len(),
                self.inputs.len()
            );
        }

        let mut sources = Vec::with_capacity(self.inputs.len());
        for (index, path) in self.inputs.iter().enumerate() {
            let poi = match self.pois.get(index).map(String::as_str) {
                None | Some("-") => None,
                Some(value) => Some(parse_poi(value)?),
            };
            sources.push(SourceSpec {
                path: path.clone(),
                poi,
            });
        }

        let heading = match self.heading_mode {
            HeadingArg::PassThrough => HeadingMode::PassThrough,
            HeadingArg::PointAtPoi => HeadingMode::PointAtPoi,
            HeadingArg::FollowCourse => HeadingMode::FollowCourse,
            HeadingArg::Fixed => HeadingMode::Fixed {
                heading_deg: self
                    .heading_angle
                    .context("--heading-angle is required with --heading-mode fixed")?,
            },
        };
        let pitch = match self.pitch_mode {
            PitchArg::Fixed => PitchMode::Fixed {
                pitch_deg: self.fixed_pitch,
            },
            PitchArg::FromSource => PitchMode::FromSource,
        };
        let altitude_type = match self.altitude_type {
            AltitudeArg::Wgs84 => AltitudeType::Wgs84,
            AltitudeArg::Relative => AltitudeType::RelativeToStartPoint,
        };

        Ok(WorkflowConfig {
            waypoints: self.waypoints,
            cruise_speed_m_s: self.speed,
            altitude_type,
            heading,
            pitch,
            ..WorkflowConfig::from_sources(sources)
        })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(path) = &args.generate_orbit {
        let orbit = match &args.orbit_config {
            Some(config_path) => OrbitConfig::load(config_path)?,
            None => OrbitConfig::default(),
        };
        write_orbit_document(path, &orbit)?;
        println!("Synthetic orbit written to {}", path.display());
        if args.workflow.is_none() && args.inputs.is_empty() {
            return Ok(());
        }
    }

    let workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        args.to_workflow_config()?
    };
    workflow_config
        .validate()
        .context("invalid conversion settings")?;

    let sources = load_sources(&workflow_config.sources, workflow_config.altitude_type)?;
    let runner = Runner::new(workflow_config);

    if args.preview {
        for source in &sources {
            let summary = runner.preview(source)?;
            println!("Preview -> {}", summary.describe());
        }
        return Ok(());
    }

    let result = runner.execute(&sources)?;
    let summary = MissionSummary::from_result(&result);
    println!("Mission -> {}", summary);
    for file in &summary.files {
        println!("  {}", file.describe());
    }

    if let Some(output) = &args.output {
        let config = runner.config();
        let reference = match &args.reference_template {
            Some(path) if path.exists() => Some(
                fs::read_to_string(path)
                    .with_context(|| format!("reading reference template {}", path.display()))?,
            ),
            Some(path) => {
                log::warn!(
                    "reference template {} not found, generating default",
                    path.display()
                );
                None
            }
            None => None,
        };
        let contents = KmzContents {
            waylines: render_waylines(&result.mission, &config.mission, config.heading)
                .context("rendering waylines.wpml")?,
            template: render_template(
                reference.as_deref(),
                &config.mission,
                chrono::Utc::now().timestamp_millis(),
            )
            .context("rendering template.kml")?,
        };
        write_kmz(output, &contents)?;
        info!("wrote {}", output.display());
        println!("KMZ written to {}", output.display());
    }

    if let Some(path) = &args.summary_json {
        summary.write_json(path)?;
    }

    Ok(())
}
