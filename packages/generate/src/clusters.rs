//! Clustered map: every service in a single marker cluster group.

use serde::Serialize;
use service_map_service_models::EnrichedServiceRecord;

use crate::RenderError;
use crate::map::{MapDocument, OPEN_STREET_MAP, Plugin};
use crate::popup::{compact_popup, tooltip};
use crate::style::style_for;

/// Output file name.
pub const FILE_NAME: &str = "clustered_services_map.html";

const ZOOM: u8 = 10;

const SCRIPT: &str = r"
const cluster = L.markerClusterGroup().addTo(map);
overlays['Services'] = cluster;
for (const s of DATA.services) {
  L.marker([s.lat, s.lng], {
    icon: L.AwesomeMarkers.icon({ icon: 'info-sign', prefix: 'glyphicon', markerColor: s.color }),
  })
    .bindPopup(s.popup, { maxWidth: 300 })
    .bindTooltip(s.tooltip)
    .addTo(cluster);
}
";

#[derive(Debug, Serialize)]
struct Payload {
    services: Vec<ClusterMarker>,
}

#[derive(Debug, Serialize)]
struct ClusterMarker {
    lat: f64,
    lng: f64,
    color: &'static str,
    popup: String,
    tooltip: String,
}

/// Builds the clustered map document.
///
/// # Errors
///
/// Returns [`RenderError`] if a popup fails to render or the marker data
/// cannot be serialized.
pub fn build(records: &[EnrichedServiceRecord]) -> Result<MapDocument, RenderError> {
    let services: Vec<ClusterMarker> = records
        .iter()
        .map(|record| -> Result<ClusterMarker, askama::Error> {
            Ok(ClusterMarker {
                lat: record.latitude,
                lng: record.longitude,
                color: style_for(record.category).color,
                popup: compact_popup(record)?,
                tooltip: tooltip(record)?,
            })
        })
        .collect::<Result<_, _>>()?;

    Ok(
        MapDocument::new("San Diego Homeless Services (Clustered)", ZOOM, OPEN_STREET_MAP)
            .plugin(Plugin::AwesomeMarkers)
            .plugin(Plugin::MarkerCluster)
            .layer_control()
            .data(serde_json::to_value(Payload { services })?)
            .script(SCRIPT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_records;

    #[test]
    fn clusters_every_record() {
        let records = test_records();
        let doc = build(&records).unwrap();
        assert!(doc.has_plugin(Plugin::MarkerCluster));
        let html = doc.render().unwrap();
        assert_eq!(html.matches("\"popup\":").count(), records.len());
        assert!(html.contains("L.markerClusterGroup()"));
        assert!(html.contains("zoom: 10"));
    }
}
