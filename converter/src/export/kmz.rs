use anyhow::Context;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const WAYLINES_ENTRY: &str = "wpmz/waylines.wpml";
pub const TEMPLATE_ENTRY: &str = "wpmz/template.kml";

/// Rendered documents that make up a KMZ mission archive.
pub struct KmzContents {
    pub waylines: String,
    pub template: String,
}

/// Writes the deflate-compressed KMZ archive, creating parent directories as needed.
pub fn write_kmz<P: AsRef<Path>>(path: P, contents: &KmzContents) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    if let Some(parent) = path_ref.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }

    let file = File::create(path_ref)
        .with_context(|| format!("creating KMZ {}", path_ref.display()))?;
    let mut archive = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (entry, body) in [
        (WAYLINES_ENTRY, &contents.waylines),
        (TEMPLATE_ENTRY, &contents.template),
    ] {
        archive
            .start_file(entry, options)
            .with_context(|| format!("adding {} to {}", entry, path_ref.display()))?;
        archive
            .write_all(body.as_bytes())
            .with_context(|| format!("writing {} to {}", entry, path_ref.display()))?;
    }

    archive
        .finish()
        .with_context(|| format!("finalizing KMZ {}", path_ref.display()))?;
    Ok(())
}
