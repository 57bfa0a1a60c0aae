//! Density heatmap with shelter markers on top.

use serde::Serialize;
use service_map_service_models::{EnrichedServiceRecord, ServiceCategory};

use crate::RenderError;
use crate::map::{LIGHT_MAP, MapDocument, Plugin};
use crate::popup::{shelter_popup, shelter_tooltip};

/// Output file name.
pub const FILE_NAME: &str = "services_density_heatmap.html";

const ZOOM: u8 = 10;

/// Heat point radius in pixels.
pub const RADIUS: u32 = 25;

const SCRIPT: &str = r"
L.heatLayer(DATA.heat, { radius: DATA.radius }).addTo(map);
for (const s of DATA.shelters) {
  L.marker([s.lat, s.lng], {
    icon: L.AwesomeMarkers.icon({ icon: 'home', prefix: 'glyphicon', markerColor: 'red' }),
  })
    .bindPopup(s.popup)
    .bindTooltip(s.tooltip)
    .addTo(map);
}
";

#[derive(Debug, Serialize)]
struct Payload {
    radius: u32,
    heat: Vec<[f64; 2]>,
    shelters: Vec<ShelterMarker>,
}

#[derive(Debug, Serialize)]
struct ShelterMarker {
    lat: f64,
    lng: f64,
    popup: String,
    tooltip: String,
}

/// Builds the heatmap document.
///
/// The heat layer covers every record; markers are drawn only for
/// `Shelter/Housing` records.
///
/// # Errors
///
/// Returns [`RenderError`] if a popup fails to render or the layer data
/// cannot be serialized.
pub fn build(records: &[EnrichedServiceRecord]) -> Result<MapDocument, RenderError> {
    let payload = Payload {
        radius: RADIUS,
        heat: records
            .iter()
            .map(|r| [r.latitude, r.longitude])
            .collect(),
        shelters: records
            .iter()
            .filter(|r| r.category == ServiceCategory::ShelterHousing)
            .map(|r| -> Result<ShelterMarker, askama::Error> {
                Ok(ShelterMarker {
                    lat: r.latitude,
                    lng: r.longitude,
                    popup: shelter_popup(r)?,
                    tooltip: shelter_tooltip(r)?,
                })
            })
            .collect::<Result<_, _>>()?,
    };

    Ok(
        MapDocument::new("San Diego Homeless Services Density", ZOOM, LIGHT_MAP)
            .plugin(Plugin::AwesomeMarkers)
            .plugin(Plugin::Heat)
            .data(serde_json::to_value(&payload)?)
            .script(SCRIPT),
    )
}
