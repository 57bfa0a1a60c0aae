#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Service dataset loading and normalization.
//!
//! Reads the homeless-services JSON dataset, converts each element into a
//! [`ServiceRecord`], and enriches records with a cleaned address, a
//! [`ServiceCategory`](service_map_service_models::ServiceCategory) and a
//! map position.

pub mod address;
pub mod category;
pub mod centroid;
pub mod enrich;

use std::path::Path;

use service_map_service_models::ServiceRecord;

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but is not a list of records.
    #[error("Dataset format error: {message}")]
    Format {
        /// Description of what went wrong.
        message: String,
    },
}

/// Reads a dataset file and returns its top-level array elements.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read, is not valid JSON, or
/// its top-level value is not an array.
pub fn load_dataset(path: &Path) -> Result<Vec<serde_json::Value>, SourceError> {
    log::info!("Loading services dataset from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    let values = parse_dataset(&contents)?;
    log::info!("Loaded {} service records", values.len());
    Ok(values)
}

/// Parses dataset JSON text into its top-level array elements.
///
/// # Errors
///
/// Returns [`SourceError`] if the text is not valid JSON or not an array.
pub fn parse_dataset(contents: &str) -> Result<Vec<serde_json::Value>, SourceError> {
    match serde_json::from_str(contents)? {
        serde_json::Value::Array(values) => Ok(values),
        other => Err(SourceError::Format {
            message: format!("expected a JSON array of records, found {}", kind(&other)),
        }),
    }
}

/// Converts raw dataset elements into [`ServiceRecord`]s.
///
/// Elements that cannot be converted are logged and skipped so one bad
/// record does not abort the batch.
#[must_use]
pub fn extract_services(values: Vec<serde_json::Value>) -> Vec<ServiceRecord> {
    let total = values.len();
    let records: Vec<ServiceRecord> = values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping service record {idx}: {e}");
                None
            }
        })
        .collect();

    if records.len() < total {
        log::warn!("Skipped {} of {total} service records", total - records.len());
    }

    records
}

const fn kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array_of_records() {
        let values = parse_dataset(
            r#"[
                {"name": "Father Joe's Villages", "address": "1501 Imperial Ave\nSan Diego, CA 92101"},
                {"name": "Food Bank", "phone": "858-527-1419"}
            ]"#,
        )
        .unwrap();
        let records = extract_services(values);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].phone.as_deref(), Some("858-527-1419"));
    }

    #[test]
    fn rejects_non_array_document() {
        let err = parse_dataset(r#"{"name": "x"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Format { .. }));
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_dataset("[{\"name\": "),
            Err(SourceError::Json(_))
        ));
    }

    #[test]
    fn skips_bad_elements_and_keeps_the_rest() {
        let values = parse_dataset(
            r#"[
                {"name": "Good"},
                "not a record",
                {"name": "Bad phone", "phone": 6195550100},
                {"name": "Also good", "description": null}
            ]"#,
        )
        .unwrap();
        let records = extract_services(values);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Good", "Also good"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_dataset(Path::new("/nonexistent/services.json")).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
