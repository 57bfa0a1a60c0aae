//! Popup and tooltip HTML for service markers.
//!
//! Popups and tooltips are askama templates; record text is escaped on
//! interpolation because Leaflet inserts this content as raw HTML.

use askama::Template;
use service_map_service_models::EnrichedServiceRecord;

use crate::style::style_for;

/// Descriptions longer than this many characters are truncated in popups.
pub const DESCRIPTION_LIMIT: usize = 200;

#[derive(Template)]
#[template(path = "popup/rich.html")]
struct RichPopup<'a> {
    name: &'a str,
    category: &'a str,
    color: &'static str,
    icon: &'static str,
    address: Option<&'a str>,
    phone: Option<&'a str>,
    website: Option<&'a str>,
    description: Option<String>,
}

#[derive(Template)]
#[template(path = "popup/compact.html")]
struct CompactPopup<'a> {
    name: &'a str,
    category: &'a str,
    address: Option<&'a str>,
    phone: Option<&'a str>,
    website: Option<&'a str>,
}

#[derive(Template)]
#[template(source = "<b>{{ name }}</b><br>{{ category }}<br>{{ address }}", ext = "html")]
struct ShelterPopup<'a> {
    name: &'a str,
    category: &'a str,
    address: &'a str,
}

#[derive(Template)]
#[template(source = "{{ name }} ({{ category }})", ext = "html")]
struct Tooltip<'a> {
    name: &'a str,
    category: &'a str,
}

#[derive(Template)]
#[template(source = "Shelter: {{ name }}", ext = "html")]
struct ShelterTooltip<'a> {
    name: &'a str,
}

/// Shortens `text` to [`DESCRIPTION_LIMIT`] characters followed by `...`.
#[must_use]
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Hover text for a marker: `"<name> (<category>)"`.
///
/// # Errors
///
/// Returns [`askama::Error`] if the template fails to render.
pub fn tooltip(record: &EnrichedServiceRecord) -> askama::Result<String> {
    Tooltip {
        name: &record.name,
        category: record.category.as_ref(),
    }
    .render()
}

/// Detailed popup for the icon map.
///
/// # Errors
///
/// Returns [`askama::Error`] if the template fails to render.
pub fn rich_popup(record: &EnrichedServiceRecord) -> askama::Result<String> {
    let style = style_for(record.category);

    RichPopup {
        name: &record.name,
        category: record.category.as_ref(),
        color: style.color,
        icon: style.icon,
        address: record.address.as_deref(),
        phone: non_blank(record.phone.as_deref()),
        website: non_blank(record.website.as_deref()),
        description: record
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(truncate_description),
    }
    .render()
}

/// Short popup for the clustered map.
///
/// # Errors
///
/// Returns [`askama::Error`] if the template fails to render.
pub fn compact_popup(record: &EnrichedServiceRecord) -> askama::Result<String> {
    CompactPopup {
        name: &record.name,
        category: record.category.as_ref(),
        address: record.address.as_deref(),
        phone: non_blank(record.phone.as_deref()),
        website: non_blank(record.website.as_deref()),
    }
    .render()
}

/// Popup for shelter markers on the heatmap.
///
/// # Errors
///
/// Returns [`askama::Error`] if the template fails to render.
pub fn shelter_popup(record: &EnrichedServiceRecord) -> askama::Result<String> {
    ShelterPopup {
        name: &record.name,
        category: record.category.as_ref(),
        address: record.address.as_deref().unwrap_or_default(),
    }
    .render()
}

/// Hover text for shelter markers on the heatmap.
///
/// # Errors
///
/// Returns [`askama::Error`] if the template fails to render.
pub fn shelter_tooltip(record: &EnrichedServiceRecord) -> askama::Result<String> {
    ShelterTooltip { name: &record.name }.render()
}
