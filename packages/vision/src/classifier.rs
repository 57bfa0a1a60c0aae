//! Pre-trained image classifier.
//!
//! [`LinearClassifier`] is a linear softmax model over raw pixels. The
//! artifact is a JSON document:
//!
//! ```json
//! {
//!   "labels": ["homeless", "not_homeless"],
//!   "input_size": 32,
//!   "weights": [[...], [...]],
//!   "bias": [0.0, 0.0]
//! }
//! ```
//!
//! Each row of `weights` has `3 * input_size * input_size` entries, one per
//! RGB channel of the resized image in row-major pixel order.

use std::collections::BTreeMap;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use image::imageops::FilterType;
use serde::Deserialize;

use crate::VisionError;

/// Default artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/homeless_classifier.json";

/// Scores images against a fixed label set.
pub trait ImageClassifier: Send + Sync {
    /// Labels in output order.
    fn labels(&self) -> &[String];

    /// Returns one probability per label. The probabilities sum to 1.
    fn predict(&self, image: &DynamicImage) -> Vec<f32>;
}

#[derive(Deserialize)]
struct Artifact {
    labels: Vec<String>,
    input_size: u32,
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

/// Linear softmax classifier over resized RGB pixels.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    labels: Vec<String>,
    input_size: u32,
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

impl LinearClassifier {
    /// Creates a classifier, validating that the dimensions agree.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Model`] if there are no labels, `input_size`
    /// is 0, or `weights`/`bias` do not match the labels and input size.
    pub fn new(
        labels: Vec<String>,
        input_size: u32,
        weights: Vec<Vec<f32>>,
        bias: Vec<f32>,
    ) -> Result<Self, VisionError> {
        let model_error = |message: String| VisionError::Model { message };

        if labels.is_empty() {
            return Err(model_error("model has no labels".to_string()));
        }
        if input_size == 0 {
            return Err(model_error("input_size must be positive".to_string()));
        }
        if weights.len() != labels.len() || bias.len() != labels.len() {
            return Err(model_error(format!(
                "expected {} weight rows and bias terms, found {} and {}",
                labels.len(),
                weights.len(),
                bias.len()
            )));
        }

        let features = feature_len(input_size)
            .ok_or_else(|| model_error("input_size too large".to_string()))?;
        if let Some((i, row)) = weights.iter().enumerate().find(|(_, r)| r.len() != features) {
            return Err(model_error(format!(
                "weight row {i} has {} entries, expected {features}",
                row.len()
            )));
        }

        Ok(Self {
            labels,
            input_size,
            weights,
            bias,
        })
    }

    /// Parses a JSON artifact.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError`] if the JSON is malformed or inconsistent.
    pub fn from_json_str(json: &str) -> Result<Self, VisionError> {
        let artifact: Artifact = serde_json::from_str(json)?;
        Self::new(
            artifact.labels,
            artifact.input_size,
            artifact.weights,
            artifact.bias,
        )
    }

    /// Loads a JSON artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError`] if the file cannot be read or is invalid.
    pub fn from_path(path: &Path) -> Result<Self, VisionError> {
        let contents = std::fs::read_to_string(path)?;
        let classifier = Self::from_json_str(&contents)?;
        log::info!(
            "Loaded classifier from {} ({} labels, {}x{} input)",
            path.display(),
            classifier.labels.len(),
            classifier.input_size,
            classifier.input_size
        );
        Ok(classifier)
    }

    fn features(&self, image: &DynamicImage) -> Vec<f32> {
        image
            .resize_exact(self.input_size, self.input_size, FilterType::Triangle)
            .to_rgb8()
            .pixels()
            .flat_map(|p| p.0)
            .map(|c| f32::from(c) / 255.0)
            .collect()
    }
}

impl ImageClassifier for LinearClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn predict(&self, image: &DynamicImage) -> Vec<f32> {
        let features = self.features(image);
        let logits: Vec<f32> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| bias + row.iter().zip(&features).map(|(w, x)| w * x).sum::<f32>())
            .collect();
        softmax(&logits)
    }
}

fn feature_len(input_size: u32) -> Option<usize> {
    let side = usize::try_from(input_size).ok()?;
    side.checked_mul(side)?.checked_mul(3)
}

/// Numerically stable softmax.
#[must_use]
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Decodes a base64 image and returns the probability of each label.
///
/// Standard base64 is expected. A `data:...;base64,` prefix and surrounding
/// whitespace are ignored.
///
/// # Errors
///
/// Returns [`VisionError::Base64`] or [`VisionError::Image`] if the payload
/// cannot be decoded.
pub fn classify_base64(
    classifier: &dyn ImageClassifier,
    data: &str,
) -> Result<BTreeMap<String, f32>, VisionError> {
    let encoded = data
        .trim()
        .split_once(";base64,")
        .map_or(data.trim(), |(_, payload)| payload);
    let bytes = STANDARD.decode(encoded)?;
    let image = image::load_from_memory(&bytes)?;

    Ok(classifier
        .labels()
        .iter()
        .cloned()
        .zip(classifier.predict(&image))
        .collect())
}
