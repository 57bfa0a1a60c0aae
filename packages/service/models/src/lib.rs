#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Service category taxonomy and service record types.
//!
//! This crate defines the closed set of service categories and the record
//! shapes shared by the source loader, the summary reporter and the map
//! renderers. Raw records come straight from the input dataset; enriched
//! records carry the derived address, category and position.

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Name used when a record has no name (or a `null` one).
pub const UNKNOWN_NAME: &str = "Unknown";

/// Top-level service category.
///
/// Variants are declared in classification priority order: when a record
/// matches keywords of several categories, the earliest variant wins.
/// [`ServiceCategory::Other`] is the fallback.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ServiceCategory {
    /// Emergency shelters, transitional and permanent housing
    #[serde(rename = "Shelter/Housing")]
    #[strum(serialize = "Shelter/Housing")]
    ShelterHousing,
    /// Meals, pantries and nutrition programs
    #[serde(rename = "Food Services")]
    #[strum(serialize = "Food Services")]
    FoodServices,
    /// Clinics, dental and pharmacy services
    #[serde(rename = "Medical/Health")]
    #[strum(serialize = "Medical/Health")]
    MedicalHealth,
    /// Counseling, therapy and psychiatric care
    #[serde(rename = "Mental Health")]
    #[strum(serialize = "Mental Health")]
    MentalHealth,
    /// Job placement and training
    #[serde(rename = "Employment")]
    #[strum(serialize = "Employment")]
    Employment,
    /// Clothing, hygiene, showers and laundry
    #[serde(rename = "Basic Needs")]
    #[strum(serialize = "Basic Needs")]
    BasicNeeds,
    /// Legal aid, advocacy and case management
    #[serde(rename = "Legal/Advocacy")]
    #[strum(serialize = "Legal/Advocacy")]
    LegalAdvocacy,
    /// Youth, children and family programs
    #[serde(rename = "Youth/Family")]
    #[strum(serialize = "Youth/Family")]
    YouthFamily,
    /// Services that don't match any other category
    #[serde(rename = "Other")]
    #[strum(serialize = "Other")]
    Other,
}

impl ServiceCategory {
    /// Returns all variants in priority order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ShelterHousing,
            Self::FoodServices,
            Self::MedicalHealth,
            Self::MentalHealth,
            Self::Employment,
            Self::BasicNeeds,
            Self::LegalAdvocacy,
            Self::YouthFamily,
            Self::Other,
        ]
    }
}

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a new position.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One service location as it appears in the input dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Organization or program name. Missing and `null` names become
    /// [`UNKNOWN_NAME`].
    #[serde(default = "unknown_name", deserialize_with = "name_or_unknown")]
    pub name: String,
    /// Free-form street address, possibly multi-line.
    #[serde(default)]
    pub address: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Website URL.
    #[serde(default)]
    pub website: Option<String>,
    /// Free-text description of the services offered.
    #[serde(default)]
    pub description: Option<String>,
}

fn unknown_name() -> String {
    UNKNOWN_NAME.to_string()
}

fn name_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_name))
}

/// A service record after address parsing, categorization and coordinate
/// assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedServiceRecord {
    /// Organization or program name.
    pub name: String,
    /// Address with line breaks and non-breaking spaces normalized.
    pub address: Option<String>,
    /// First 5-digit run found in the raw address.
    pub zip_code: Option<String>,
    /// Contact phone number, as given.
    pub phone: Option<String>,
    /// Website URL, as given.
    pub website: Option<String>,
    /// Description, as given.
    pub description: Option<String>,
    /// Assigned category.
    pub category: ServiceCategory,
    /// Latitude including jitter.
    pub latitude: f64,
    /// Longitude including jitter.
    pub longitude: f64,
}

impl EnrichedServiceRecord {
    /// Returns the record's position.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Whether the record has a phone number with visible characters.
    #[must_use]
    pub fn has_phone(&self) -> bool {
        has_text(self.phone.as_deref())
    }

    /// Whether the record has a website with visible characters.
    #[must_use]
    pub fn has_website(&self) -> bool {
        has_text(self.website.as_deref())
    }
}

/// Returns `true` when `value` is present and not blank.
#[must_use]
pub fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_round_trip_through_strum() {
        for category in ServiceCategory::all() {
            let label = category.to_string();
            let parsed: ServiceCategory = label.parse().unwrap();
            assert_eq!(parsed, *category, "label {label} did not parse back");
        }
    }

    #[test]
    fn category_serializes_as_label() {
        let json = serde_json::to_string(&ServiceCategory::ShelterHousing).unwrap();
        assert_eq!(json, "\"Shelter/Housing\"");
        assert_eq!(ServiceCategory::LegalAdvocacy.as_ref(), "Legal/Advocacy");
    }

    #[test]
    fn all_is_in_priority_order_and_ends_with_other() {
        let all = ServiceCategory::all();
        assert_eq!(all.len(), 9);
        assert_eq!(all.first(), Some(&ServiceCategory::ShelterHousing));
        assert_eq!(all.last(), Some(&ServiceCategory::Other));
        for window in all.windows(2) {
            assert!(window[0] < window[1]);
        }
    }

    #[test]
    fn missing_or_null_name_becomes_unknown() {
        let missing: ServiceRecord = serde_json::from_str(r#"{"address": "x"}"#).unwrap();
        assert_eq!(missing.name, UNKNOWN_NAME);

        let null: ServiceRecord = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(null.name, UNKNOWN_NAME);
        assert_eq!(null.address, None);
    }

    #[test]
    fn ignores_unknown_fields() {
        let record: ServiceRecord =
            serde_json::from_str(r#"{"name": "Pantry", "hours": "9-5"}"#).unwrap();
        assert_eq!(record.name, "Pantry");
    }

    #[test]
    fn blank_contact_fields_do_not_count() {
        assert!(!has_text(None));
        assert!(!has_text(Some("   ")));
        assert!(has_text(Some("619-555-0100")));
    }
}
