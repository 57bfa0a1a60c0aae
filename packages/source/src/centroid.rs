//! Zip code centroid lookup and coordinate jitter.
//!
//! The dataset has street addresses but no coordinates, so each service is
//! placed at the centroid of its zip code. Many services share a zip code,
//! so a small Gaussian jitter is added to keep their markers apart. The
//! random source is supplied by the caller; seed it for reproducible output.
//!
//! Centroid tables are TOML files. The San Diego table is embedded at
//! compile time and returned by [`ZipCentroidTable::san_diego`].

use std::collections::BTreeMap;
use std::path::Path;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;
use service_map_service_models::Coordinates;
use thiserror::Error;

const SAN_DIEGO_TOML: &str = include_str!("../centroids/san_diego.toml");

/// Errors from loading centroid tables or configuring jitter.
#[derive(Debug, Error)]
pub enum CentroidError {
    /// Reading a table file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A table file is not valid TOML or has the wrong shape.
    #[error("Invalid centroid table: {0}")]
    Toml(#[from] toml::de::Error),

    /// The jitter standard deviation is negative or not finite.
    #[error("Invalid jitter standard deviation {std_dev}: expected a finite value >= 0")]
    InvalidStdDev {
        /// The rejected value.
        std_dev: f64,
    },
}

/// Maps zip codes to representative positions.
#[derive(Debug, Clone, Deserialize)]
pub struct ZipCentroidTable {
    /// Human-readable region name.
    pub name: String,
    /// Position used for absent or unknown zip codes.
    pub default: Coordinates,
    /// Zip code to centroid.
    #[serde(default)]
    pub zips: BTreeMap<String, Coordinates>,
}

impl ZipCentroidTable {
    /// Returns the built-in San Diego table.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (this is a compile-time
    /// guarantee since the table is embedded).
    #[must_use]
    pub fn san_diego() -> Self {
        Self::from_toml_str(SAN_DIEGO_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded San Diego centroids: {e}"))
    }

    /// Parses a table from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`CentroidError::Toml`] if the document is malformed.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, CentroidError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Reads and parses a table file.
    ///
    /// # Errors
    ///
    /// Returns [`CentroidError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, CentroidError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Returns the centroid for `zip`, falling back to the default centroid
    /// when the zip is absent or not in the table.
    #[must_use]
    pub fn base_coordinates(&self, zip: Option<&str>) -> Coordinates {
        zip.and_then(|z| self.zips.get(z))
            .copied()
            .unwrap_or(self.default)
    }

    /// Number of zip codes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zips.len()
    }

    /// Whether the table has no zip entries (only a default).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zips.is_empty()
    }
}

/// Independent Gaussian noise added to latitude and longitude.
#[derive(Debug, Clone, Copy)]
pub struct Jitter {
    normal: Option<Normal<f64>>,
}

impl Jitter {
    /// Default standard deviation, in degrees (roughly 500 m).
    pub const DEFAULT_STD_DEV: f64 = 0.005;

    /// Creates a jitter with mean 0 and the given standard deviation in
    /// degrees. A standard deviation of 0 disables jitter.
    ///
    /// # Errors
    ///
    /// Returns [`CentroidError::InvalidStdDev`] if `std_dev` is negative or
    /// not finite.
    pub fn new(std_dev: f64) -> Result<Self, CentroidError> {
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(CentroidError::InvalidStdDev { std_dev });
        }
        if std_dev == 0.0 {
            return Ok(Self::none());
        }
        let normal =
            Normal::new(0.0, std_dev).map_err(|_| CentroidError::InvalidStdDev { std_dev })?;
        Ok(Self {
            normal: Some(normal),
        })
    }

    /// A jitter that leaves coordinates unchanged.
    #[must_use]
    pub const fn none() -> Self {
        Self { normal: None }
    }

    /// Returns `base` shifted by one independent sample per axis.
    pub fn apply<R: Rng + ?Sized>(&self, base: Coordinates, rng: &mut R) -> Coordinates {
        let Some(normal) = &self.normal else {
            return base;
        };
        let latitude = base.latitude + normal.sample(rng);
        let longitude = base.longitude + normal.sample(rng);
        Coordinates::new(latitude, longitude)
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STD_DEV).unwrap_or_else(|_| Self::none())
    }
}
