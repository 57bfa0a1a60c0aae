#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Image recognition for the services API.
//!
//! Two independent backends:
//!
//! - [`eyepop`]: a client for the `EyePop` hosted inference API, which runs
//!   a configured pipeline ("pop") against an image URL
//! - [`classifier`]: a local pre-trained classifier that scores a
//!   base64-encoded image against a fixed set of labels

pub mod classifier;
pub mod eyepop;

use thiserror::Error;

/// Errors that can occur during recognition or classification.
#[derive(Debug, Error)]
pub enum VisionError {
    /// HTTP request to the recognition API failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a model artifact failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image payload is not valid base64.
    #[error("Invalid base64 image: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The image bytes could not be decoded.
    #[error("Invalid image: {0}")]
    Image(#[from] image::ImageError),

    /// The recognition API returned an error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// A classifier artifact is inconsistent or unavailable.
    #[error("Model error: {message}")]
    Model {
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}
