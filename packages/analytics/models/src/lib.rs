#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summary statistics types for service datasets.

use serde::{Deserialize, Serialize};
use service_map_service_models::ServiceCategory;

/// Aggregate statistics over an enriched service dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    /// Number of records.
    pub total: u64,
    /// Records per category, largest first. Empty categories are omitted.
    pub by_category: Vec<CategoryCount>,
    /// Zip codes with the most records, largest first (at most ten).
    pub top_zip_codes: Vec<ZipCount>,
    /// Records with a non-blank phone number.
    pub with_phone: Coverage,
    /// Records with a non-blank website.
    pub with_website: Coverage,
}

/// Number of records in a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// The category.
    pub category: ServiceCategory,
    /// Number of records.
    pub count: u64,
    /// Share of all records, 0-100.
    pub percentage: f64,
}

/// Number of records sharing a zip code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipCount {
    /// Five-digit zip code.
    pub zip_code: String,
    /// Number of records.
    pub count: u64,
}

/// How many records have a given attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    /// Number of records with the attribute.
    pub count: u64,
    /// Share of all records, 0-100.
    pub percentage: f64,
}
