#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for generating interactive service maps from the homeless
//! services dataset.
//!
//! The pipeline loads the dataset, enriches each record with a category and
//! a jittered zip-centroid position, and renders three standalone Leaflet
//! pages over the same record set:
//!
//! - [`markers`]: colour-coded icon markers in per-category layers
//! - [`clusters`]: markers grouped with Leaflet.markercluster
//! - [`heatmap`]: a density heatmap with shelter markers
//!
//! Each page is written independently. A failed page is logged and
//! reported after the others have been attempted.

pub mod clusters;
pub mod heatmap;
pub mod map;
pub mod markers;
pub mod popup;
pub mod style;

use std::path::{Path, PathBuf};

use rand::SeedableRng as _;
use rand::rngs::StdRng;
use service_map_service_models::EnrichedServiceRecord;
use service_map_source::centroid::{CentroidError, Jitter, ZipCentroidTable};
use service_map_source::enrich::enrich_all;
use service_map_source::{SourceError, extract_services, load_dataset};
use thiserror::Error;

use crate::map::MapDocument;

/// File name for the enriched record export.
pub const EXPORT_FILE_NAME: &str = "services_enriched.json";

/// Errors from building or writing a single output file.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedded data could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A page or popup template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Errors from the generation pipeline.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The dataset could not be loaded.
    #[error("Failed to load services data: {0}")]
    Source(#[from] SourceError),

    /// The centroid table or jitter settings are invalid.
    #[error(transparent)]
    Centroid(#[from] CentroidError),

    /// An output file could not be written.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Some maps were not generated.
    #[error("Failed to generate: {}", failed.join(", "))]
    Incomplete {
        /// File names of the maps that failed.
        failed: Vec<String>,
    },
}

/// Settings for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Dataset JSON file.
    pub input: PathBuf,
    /// Directory the HTML (and optional JSON) files are written to.
    pub output_dir: PathBuf,
    /// Seed for the coordinate jitter. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Alternate centroid table. `None` uses the built-in San Diego table.
    pub centroids: Option<PathBuf>,
    /// Jitter standard deviation in degrees.
    pub jitter_std_dev: f64,
}

/// Signature shared by the map builders.
pub type MapBuilder = fn(&[EnrichedServiceRecord]) -> Result<MapDocument, RenderError>;

/// Every map produced by a run, in generation order.
pub const MAPS: &[(&str, MapBuilder)] = &[
    (markers::FILE_NAME, markers::build),
    (clusters::FILE_NAME, clusters::build),
    (heatmap::FILE_NAME, heatmap::build),
];

/// Result of rendering all maps.
#[derive(Debug, Default)]
pub struct RenderOutcome {
    /// Paths of the files written.
    pub written: Vec<PathBuf>,
    /// File names of the maps that failed.
    pub failed: Vec<String>,
}

impl RenderOutcome {
    /// Converts into an error if any map failed.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Incomplete`] listing the failed maps.
    pub fn into_result(self) -> Result<Vec<PathBuf>, GenerateError> {
        if self.failed.is_empty() {
            Ok(self.written)
        } else {
            Err(GenerateError::Incomplete {
                failed: self.failed,
            })
        }
    }
}

/// Loads the dataset and enriches every record.
///
/// # Errors
///
/// Returns [`GenerateError`] if the centroid table or jitter settings are
/// invalid, or the dataset cannot be read.
pub fn prepare(options: &GenerateOptions) -> Result<Vec<EnrichedServiceRecord>, GenerateError> {
    let table = match &options.centroids {
        Some(path) => {
            log::info!("Loading centroid table from {}", path.display());
            ZipCentroidTable::from_path(path)?
        }
        None => ZipCentroidTable::san_diego(),
    };
    let jitter = Jitter::new(options.jitter_std_dev)?;

    let values = load_dataset(&options.input)?;
    let services = extract_services(values);
    log::info!("Extracted {} services", services.len());

    let mut rng = options
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    Ok(enrich_all(&services, &table, &jitter, &mut rng))
}

/// Renders `document` and writes it to `dir/file_name`.
///
/// # Errors
///
/// Returns [`RenderError`] if rendering or writing fails.
pub fn write_map(
    dir: &Path,
    file_name: &str,
    document: &MapDocument,
) -> Result<PathBuf, RenderError> {
    let path = dir.join(file_name);
    std::fs::write(&path, document.render()?)?;
    Ok(path)
}

/// Builds and writes every map in [`MAPS`] to `dir`.
///
/// A failing map does not stop the remaining ones.
#[must_use]
pub fn render_maps(records: &[EnrichedServiceRecord], dir: &Path) -> RenderOutcome {
    let mut outcome = RenderOutcome::default();

    if let Err(e) = std::fs::create_dir_all(dir) {
        log::error!("Failed to create output directory {}: {e}", dir.display());
        outcome.failed = MAPS.iter().map(|(name, _)| (*name).to_string()).collect();
        return outcome;
    }

    for (file_name, build) in MAPS {
        log::info!("Creating {file_name}...");
        match build(records).and_then(|doc| write_map(dir, file_name, &doc)) {
            Ok(path) => {
                log::info!("Saved {}", path.display());
                outcome.written.push(path);
            }
            Err(e) => {
                log::error!("Failed to create {file_name}: {e}");
                outcome.failed.push((*file_name).to_string());
            }
        }
    }

    outcome
}

/// Writes the enriched records as pretty-printed JSON to
/// `dir/`[`EXPORT_FILE_NAME`].
///
/// # Errors
///
/// Returns [`RenderError`] if serialization or writing fails.
pub fn export_json(records: &[EnrichedServiceRecord], dir: &Path) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    std::fs::write(&path, serde_json::to_string_pretty(records)?)?;
    log::info!("Exported {} records to {}", records.len(), path.display());
    Ok(path)
}

#[cfg(test)]
pub(crate) fn test_records() -> Vec<EnrichedServiceRecord> {
    use service_map_service_models::ServiceCategory;

    let record = |name: &str, category: ServiceCategory, zip: &str, lat: f64, lng: f64| {
        EnrichedServiceRecord {
            name: name.to_string(),
            address: Some(format!("100 Test St, San Diego, CA {zip}")),
            zip_code: Some(zip.to_string()),
            phone: Some("619-555-0100".to_string()),
            website: None,
            description: Some("Test service".to_string()),
            category,
            latitude: lat,
            longitude: lng,
        }
    };

    vec![
        record("Harbor House", ServiceCategory::ShelterHousing, "92101", 32.716, -117.161),
        record("Community Pantry", ServiceCategory::FoodServices, "92113", 32.696, -117.118),
        record("Family Clinic", ServiceCategory::MedicalHealth, "92105", 32.737, -117.090),
        record("Bridge Beds", ServiceCategory::ShelterHousing, "92102", 32.716, -117.126),
        record("Drop-in Center", ServiceCategory::Other, "92104", 32.741, -117.128),
    ]
}
