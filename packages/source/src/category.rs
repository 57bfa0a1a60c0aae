//! Service category classification.
//!
//! Datasets describe services in free text, so categories are assigned by
//! keyword detection over the record's name and description. Rules are
//! evaluated in [`ServiceCategory`] priority order and the first match wins.

use service_map_service_models::ServiceCategory;

/// Ordered classification rules. The position of a rule in this list is its
/// priority.
const RULES: &[(ServiceCategory, &[&str])] = &[
    (
        ServiceCategory::ShelterHousing,
        &["shelter", "housing", "emergency", "transitional"],
    ),
    (
        ServiceCategory::FoodServices,
        &["food", "meal", "nutrition", "pantry", "kitchen"],
    ),
    (
        ServiceCategory::MedicalHealth,
        &["medical", "health", "clinic", "dental", "pharmacy"],
    ),
    (
        ServiceCategory::MentalHealth,
        &["mental", "counseling", "therapy", "psychiatric", "behavioral"],
    ),
    (
        ServiceCategory::Employment,
        &["job", "employment", "training", "career", "work"],
    ),
    (
        ServiceCategory::BasicNeeds,
        &["clothing", "hygiene", "shower", "laundry", "personal"],
    ),
    (
        ServiceCategory::LegalAdvocacy,
        &["legal", "advocacy", "case management"],
    ),
    (
        ServiceCategory::YouthFamily,
        &["youth", "children", "family"],
    ),
];

/// Assigns a category to a service from its name and description.
///
/// Matching is case-insensitive substring search over both fields. Returns
/// [`ServiceCategory::Other`] when no rule matches, including when both
/// fields are absent or empty.
#[must_use]
pub fn classify(name: Option<&str>, description: Option<&str>) -> ServiceCategory {
    let name = name.unwrap_or_default().to_lowercase();
    let description = description.unwrap_or_default().to_lowercase();

    RULES
        .iter()
        .find(|(_, keywords)| contains_any(&name, keywords) || contains_any(&description, keywords))
        .map_or(ServiceCategory::Other, |(category, _)| *category)
}

/// Returns the keywords that select `category`, or an empty slice for
/// [`ServiceCategory::Other`].
#[must_use]
pub fn keywords_for(category: ServiceCategory) -> &'static [&'static str] {
    match RULES.iter().find(|(c, _)| *c == category) {
        Some((_, keywords)) => *keywords,
        None => &[],
    }
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
