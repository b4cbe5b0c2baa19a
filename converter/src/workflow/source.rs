use crate::workflow::config::SourceSpec;
use anyhow::Context;
use missioncore::ges_interface::GesDocument;
use missioncore::model::{AltitudeType, GeoFrame, PointOfInterest};
use std::fs;
use std::path::Path;

/// A parsed source animation ready for the pipeline.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub id: String,
    pub selection_order: usize,
    pub frames: Vec<GeoFrame>,
    pub poi: Option<PointOfInterest>,
    pub field_of_view: Option<f64>,
}

impl LoadedSource {
    pub fn load(
        spec: &SourceSpec,
        selection_order: usize,
        altitude_type: AltitudeType,
    ) -> anyhow::Result<Self> {
        let path = spec.path.as_path();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading source {}", path.display()))?;
        let id = source_id(path);
        let document = GesDocument::from_json_str(&contents)
            .map_err(|err| err.in_file(&id))
            .with_context(|| format!("parsing source {}", path.display()))?;
        Self::from_document(
            id,
            selection_order,
            &document,
            spec.poi,
            altitude_type,
        )
    }

    pub fn from_document(
        id: String,
        selection_order: usize,
        document: &GesDocument,
        poi: Option<PointOfInterest>,
        altitude_type: AltitudeType,
    ) -> anyhow::Result<Self> {
        let frames = document
            .to_geo_frames(altitude_type)
            .map_err(|err| err.in_file(&id))
            .with_context(|| format!("reading camera frames of {}", id))?;
        Ok(Self {
            id,
            selection_order,
            frames,
            poi,
            field_of_view: document.field_of_view(),
        })
    }
}

/// Loads every source in selection order.
pub fn load_sources(
    specs: &[SourceSpec],
    altitude_type: AltitudeType,
) -> anyhow::Result<Vec<LoadedSource>> {
    specs
        .iter()
        .enumerate()
        .map(|(order, spec)| LoadedSource::load(spec, order, altitude_type))
        .collect()
}

/// Files are identified by their path as given, so equal names in different directories stay apart.
fn source_id(path: &Path) -> String {
    path.display().to_string()
}
