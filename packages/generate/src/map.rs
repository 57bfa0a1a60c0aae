//! Self-contained Leaflet HTML documents.
//!
//! A [`MapDocument`] renders through the `map.html` template to a single
//! HTML file that loads Leaflet and the plugins it needs from public CDNs,
//! embeds its data as a JSON literal bound to `DATA`, and runs a
//! renderer-specific script against the map.
//!
//! The document script exposes these globals to the renderer script:
//! `DATA`, `map`, `baseLayers` and `overlays` (name to layer, fed to the
//! layer control when enabled).

use std::collections::BTreeSet;

use askama::Template;
use service_map_service_models::Coordinates;

use crate::RenderError;

/// Downtown San Diego.
pub const SAN_DIEGO_CENTER: Coordinates = Coordinates::new(32.7157, -117.1611);

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// A raster base layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayer {
    /// Name shown in the layer control.
    pub name: &'static str,
    /// XYZ URL template.
    pub url: &'static str,
    /// Attribution HTML.
    pub attribution: &'static str,
}

/// Standard OpenStreetMap tiles.
pub const OPEN_STREET_MAP: TileLayer = TileLayer {
    name: "OpenStreetMap",
    url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
    attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
};

/// CartoDB Positron.
pub const LIGHT_MAP: TileLayer = TileLayer {
    name: "Light Map",
    url: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
    attribution: "&copy; OpenStreetMap contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>",
};

/// CartoDB Dark Matter.
pub const DARK_MAP: TileLayer = TileLayer {
    name: "Dark Map",
    url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
    attribution: "&copy; OpenStreetMap contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>",
};

/// OpenTopoMap terrain tiles.
pub const TERRAIN: TileLayer = TileLayer {
    name: "Terrain",
    url: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
    attribution: "Map data &copy; OpenStreetMap contributors, SRTM | Map style &copy; <a href=\"https://opentopomap.org\">OpenTopoMap</a>",
};

/// Leaflet plugins a document can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Plugin {
    /// Coloured markers with Font Awesome / Glyphicon icons.
    AwesomeMarkers,
    /// Marker clustering.
    MarkerCluster,
    /// Heatmap layer.
    Heat,
    /// Fullscreen toggle control.
    Fullscreen,
    /// Collapsible overview minimap.
    MiniMap,
    /// Marker search control.
    Search,
}

impl Plugin {
    const fn stylesheets(self) -> &'static [&'static str] {
        match self {
            Self::AwesomeMarkers => &[
                "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css",
                "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/4.7.0/css/font-awesome.min.css",
                "https://netdna.bootstrapcdn.com/bootstrap/3.0.0/css/bootstrap-glyphicons.css",
            ],
            Self::MarkerCluster => &[
                "https://unpkg.com/leaflet.markercluster@1.4.1/dist/MarkerCluster.css",
                "https://unpkg.com/leaflet.markercluster@1.4.1/dist/MarkerCluster.Default.css",
            ],
            Self::Heat => &[],
            Self::Fullscreen => {
                &["https://cdn.jsdelivr.net/npm/leaflet.fullscreen@3.0.0/Control.FullScreen.css"]
            }
            Self::MiniMap => &[
                "https://cdnjs.cloudflare.com/ajax/libs/leaflet-minimap/3.6.1/Control.MiniMap.min.css",
            ],
            Self::Search => {
                &["https://cdn.jsdelivr.net/npm/leaflet-search@3.0.2/dist/leaflet-search.min.css"]
            }
        }
    }

    const fn scripts(self) -> &'static [&'static str] {
        match self {
            Self::AwesomeMarkers => &[
                "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js",
            ],
            Self::MarkerCluster => {
                &["https://unpkg.com/leaflet.markercluster@1.4.1/dist/leaflet.markercluster.js"]
            }
            Self::Heat => &["https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js"],
            Self::Fullscreen => {
                &["https://cdn.jsdelivr.net/npm/leaflet.fullscreen@3.0.0/Control.FullScreen.min.js"]
            }
            Self::MiniMap => &[
                "https://cdnjs.cloudflare.com/ajax/libs/leaflet-minimap/3.6.1/Control.MiniMap.min.js",
            ],
            Self::Search => {
                &["https://cdn.jsdelivr.net/npm/leaflet-search@3.0.2/dist/leaflet-search.min.js"]
            }
        }
    }
}

/// Builder for a standalone Leaflet map page.
#[derive(Debug, Clone)]
pub struct MapDocument {
    title: String,
    center: Coordinates,
    zoom: u8,
    base_layers: Vec<TileLayer>,
    plugins: BTreeSet<Plugin>,
    layer_control: bool,
    data: serde_json::Value,
    script: String,
}

impl MapDocument {
    /// Creates a document centred on San Diego with a single base layer.
    #[must_use]
    pub fn new(title: impl Into<String>, zoom: u8, base: TileLayer) -> Self {
        Self {
            title: title.into(),
            center: SAN_DIEGO_CENTER,
            zoom,
            base_layers: vec![base],
            plugins: BTreeSet::new(),
            layer_control: false,
            data: serde_json::Value::Null,
            script: String::new(),
        }
    }

    /// Adds an alternative base layer (not shown initially).
    #[must_use]
    pub fn base_layer(mut self, layer: TileLayer) -> Self {
        self.base_layers.push(layer);
        self
    }

    /// Loads `plugin`. Fullscreen and minimap controls are added
    /// automatically; the other plugins are used by the renderer script.
    #[must_use]
    pub fn plugin(mut self, plugin: Plugin) -> Self {
        self.plugins.insert(plugin);
        self
    }

    /// Adds a layer control listing base layers and `overlays`.
    #[must_use]
    pub const fn layer_control(mut self) -> Self {
        self.layer_control = true;
        self
    }

    /// Data exposed to the script as `DATA`.
    #[must_use]
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Renderer-specific JavaScript, run after the map is created.
    #[must_use]
    pub fn script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }

    /// Whether `plugin` will be loaded.
    #[must_use]
    pub fn has_plugin(&self, plugin: Plugin) -> bool {
        self.plugins.contains(&plugin)
    }

    /// Renders the complete HTML page.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the embedded data cannot be serialized or
    /// the page template fails to render.
    pub fn render(&self) -> Result<String, RenderError> {
        let base_layers: Vec<BaseLayerScript> = self
            .base_layers
            .iter()
            .map(|layer| -> Result<BaseLayerScript, serde_json::Error> {
                Ok(BaseLayerScript {
                    name: script_safe_json(layer.name)?,
                    url: script_safe_json(layer.url)?,
                    attribution: script_safe_json(layer.attribution)?,
                })
            })
            .collect::<Result<_, serde_json::Error>>()?;

        let minimap_url = match self.base_layers.first() {
            Some(first) if self.has_plugin(Plugin::MiniMap) => {
                Some(script_safe_json(first.url)?)
            }
            _ => None,
        };

        let page = MapPage {
            title: &self.title,
            leaflet_css: LEAFLET_CSS,
            leaflet_js: LEAFLET_JS,
            stylesheets: self
                .plugins
                .iter()
                .flat_map(|p| p.stylesheets())
                .copied()
                .collect(),
            scripts: self
                .plugins
                .iter()
                .flat_map(|p| p.scripts())
                .copied()
                .collect(),
            data: script_safe_json(&self.data)?,
            latitude: self.center.latitude,
            longitude: self.center.longitude,
            zoom: self.zoom,
            base_layers,
            script: self.script.trim_end(),
            layer_control: self.layer_control,
            fullscreen: self.has_plugin(Plugin::Fullscreen),
            minimap_url,
        };

        Ok(page.render()?)
    }
}

/// A base layer as JavaScript string literals.
struct BaseLayerScript {
    name: String,
    url: String,
    attribution: String,
}

#[derive(Template)]
#[template(path = "map.html")]
struct MapPage<'a> {
    title: &'a str,
    leaflet_css: &'static str,
    leaflet_js: &'static str,
    stylesheets: Vec<&'static str>,
    scripts: Vec<&'static str>,
    data: String,
    latitude: f64,
    longitude: f64,
    zoom: u8,
    base_layers: Vec<BaseLayerScript>,
    script: &'a str,
    layer_control: bool,
    fullscreen: bool,
    minimap_url: Option<String>,
}

/// Serializes `value` as a JavaScript literal that is safe inside a
/// `<script>` element.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if `value` cannot be serialized.
pub fn script_safe_json<T: serde::Serialize + ?Sized>(
    value: &T,
) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_base_document() {
        let html = MapDocument::new("Test Map", 11, OPEN_STREET_MAP)
            .render()
            .unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test Map</title>"));
        assert!(html.contains("leaflet@1.9.4"));
        assert!(html.contains("leaflet.js\"></script>"));
        assert!(html.contains("center: [32.7157, -117.1611], zoom: 11"));
        assert!(html.contains("baseLayers[\"OpenStreetMap\"].addTo(map);"));
        assert!(html.contains("const DATA = null;"));
        assert!(!html.contains("L.control.layers"));
        assert!(!html.contains("MiniMap"));
    }

    #[test]
    fn only_first_base_layer_is_shown() {
        let html = MapDocument::new("t", 10, OPEN_STREET_MAP)
            .base_layer(LIGHT_MAP)
            .base_layer(DARK_MAP)
            .layer_control()
            .render()
            .unwrap();
        assert!(html.contains("baseLayers[\"Light Map\"] = L.tileLayer("));
        assert!(!html.contains("baseLayers[\"Light Map\"].addTo(map);"));
        assert!(html.contains("L.control.layers(baseLayers, overlays)"));
    }

    #[test]
    fn plugins_load_assets_and_controls() {
        let html = MapDocument::new("t", 10, OPEN_STREET_MAP)
            .plugin(Plugin::Fullscreen)
            .plugin(Plugin::MiniMap)
            .plugin(Plugin::Heat)
            .render()
            .unwrap();
        assert!(html.contains("leaflet-heat.js"));
        assert!(html.contains("L.control.fullscreen().addTo(map);"));
        assert!(html.contains("toggleDisplay: true"));
        assert!(!html.contains("markercluster"));
    }

    #[test]
    fn embedded_data_cannot_close_the_script() {
        let html = MapDocument::new("t", 10, OPEN_STREET_MAP)
            .data(json!({ "name": "</script><script>alert(1)</script>" }))
            .render()
            .unwrap();
        assert_eq!(html.matches("</script>").count(), 2);
        assert!(html.contains(r"<\/script>"));
    }

    #[test]
    fn title_is_escaped() {
        let html = MapDocument::new("<b>x</b>", 10, OPEN_STREET_MAP)
            .render()
            .unwrap();
        assert!(html.contains("<title>&lt;b&gt;x&lt;"));
        assert!(!html.contains("<b>x</b>"));
    }
}
