//! Icon map: one styled marker per service, grouped by category.

use serde::Serialize;
use service_map_service_models::{EnrichedServiceRecord, ServiceCategory};

use crate::RenderError;
use crate::map::{DARK_MAP, LIGHT_MAP, MapDocument, OPEN_STREET_MAP, Plugin, TERRAIN};
use crate::popup::{rich_popup, tooltip};
use crate::style::style_for;

/// Output file name.
pub const FILE_NAME: &str = "enhanced_homeless_services_map.html";

const ZOOM: u8 = 11;

const SCRIPT: &str = r"
const groups = {};
for (const category of DATA.categories) {
  groups[category] = L.featureGroup().addTo(map);
  overlays[category] = groups[category];
}
for (const s of DATA.services) {
  L.marker([s.lat, s.lng], {
    name: s.name,
    icon: L.AwesomeMarkers.icon({ icon: s.icon, prefix: 'fa', markerColor: s.color }),
  })
    .bindPopup(s.popup, { maxWidth: 350 })
    .bindTooltip(s.tooltip)
    .addTo(groups[s.category]);
}
map.addControl(new L.Control.Search({
  layer: L.featureGroup(Object.values(groups)),
  propertyName: 'name',
  buildTip: (text) => {
    const tip = L.DomUtil.create('li', '');
    tip.textContent = text;
    return tip;
  },
  textPlaceholder: 'Search for services...',
  collapsed: false,
  initial: false,
  marker: false,
  zoom: 16,
}));
";

#[derive(Debug, Serialize)]
struct Payload<'a> {
    categories: Vec<&'static str>,
    services: Vec<IconMarker<'a>>,
}

#[derive(Debug, Serialize)]
struct IconMarker<'a> {
    lat: f64,
    lng: f64,
    name: &'a str,
    category: &'a str,
    color: &'static str,
    icon: &'static str,
    popup: String,
    tooltip: String,
}

/// Builds the icon map document.
///
/// Every category gets a toggleable layer, in priority order, even when no
/// record falls in it.
///
/// # Errors
///
/// Returns [`RenderError`] if a popup fails to render or the marker data
/// cannot be serialized.
pub fn build(records: &[EnrichedServiceRecord]) -> Result<MapDocument, RenderError> {
    let payload = Payload {
        categories: ServiceCategory::all()
            .iter()
            .map(|c| <ServiceCategory as AsRef<str>>::as_ref(c))
            .collect(),
        services: records
            .iter()
            .map(|record| -> Result<IconMarker<'_>, askama::Error> {
                let style = style_for(record.category);
                Ok(IconMarker {
                    lat: record.latitude,
                    lng: record.longitude,
                    name: &record.name,
                    category: record.category.as_ref(),
                    color: style.color,
                    icon: style.icon,
                    popup: rich_popup(record)?,
                    tooltip: tooltip(record)?,
                })
            })
            .collect::<Result<_, askama::Error>>()?,
    };

    Ok(
        MapDocument::new("San Diego Homeless Services", ZOOM, OPEN_STREET_MAP)
            .base_layer(LIGHT_MAP)
            .base_layer(DARK_MAP)
            .base_layer(TERRAIN)
            .plugin(Plugin::AwesomeMarkers)
            .plugin(Plugin::Fullscreen)
            .plugin(Plugin::MiniMap)
            .plugin(Plugin::Search)
            .layer_control()
            .data(serde_json::to_value(&payload)?)
            .script(SCRIPT),
    )
}
