use crate::geometry::Coverage;
use crate::output::area_summary;
use crate::points::{Dataset, PointRecord};

use geojson::{Feature, FeatureCollection, Value};
use log::debug;
use serde::Serialize;

pub const UNION_LAYER_NAME: &str = "Union of Circles";

const DEFAULT_CENTER: (f64, f64) = (0.0, 0.0);

const MAP_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>__TITLE__</title>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"></script>
  <style>
    html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
    #map { position: absolute; top: 0; bottom: 0; right: 0; left: 0; }
    .area-annotation {
      font-size: 15pt;
      background: rgba(255, 255, 255, 0.85);
      padding: 4px 8px;
      border-radius: 4px;
    }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
    const doc = __MAP_DATA__;

    const map = L.map("map").setView(doc.center, doc.zoom);
    const tiles = L.tileLayer("https://tile.openstreetmap.org/{z}/{x}/{y}.png", {
      maxZoom: 19,
      attribution: '&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors'
    }).addTo(map);

    const markers = L.layerGroup(doc.markers.map(m =>
      L.marker([m.lat, m.lon]).bindPopup(m.popup))).addTo(map);

    const circles = L.layerGroup(doc.circles.map(c =>
      L.circle([c.lat, c.lon], {
        radius: c.radius,
        color: c.color,
        fill: true,
        fillOpacity: c.fill_opacity
      }))).addTo(map);

    const overlays = { "Points": markers, "Circles": circles };

    if (doc.union !== null) {
      overlays[doc.union_name] = L.geoJSON(doc.union).addTo(map);
    }

    if (doc.annotation !== null) {
      const annotation = L.control({ position: "bottomleft" });
      annotation.onAdd = function () {
        const div = L.DomUtil.create("div", "area-annotation");
        div.textContent = doc.annotation;
        return div;
      };
      annotation.addTo(map);
    }

    if (doc.layer_control) {
      L.control.layers({ "OpenStreetMap": tiles }, overlays).addTo(map);
    }
  </script>
</body>
</html>
"#;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub popup: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CircleOverlay {
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
    pub color: String,
    pub fill_opacity: f64,
}

// Leaflet map being assembled. Serialized once by to_html().
#[derive(Serialize, Debug)]
pub struct MapDocument {
    center: (f64, f64),
    zoom: u8,
    markers: Vec<Marker>,
    circles: Vec<CircleOverlay>,
    union: Option<FeatureCollection>,
    union_name: String,
    annotation: Option<String>,
    layer_control: bool,
}

impl MapDocument {
    pub fn new(center: (f64, f64), zoom: u8) -> Self {
        Self {
            center: center,
            zoom: zoom,
            markers: vec![],
            circles: vec![],
            union: None,
            union_name: UNION_LAYER_NAME.to_string(),
            annotation: None,
            layer_control: false,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn circles(&self) -> &[CircleOverlay] {
        &self.circles
    }

    pub fn union_features(&self) -> usize {
        self.union.as_ref().map_or(0, |fc| fc.features.len())
    }

    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    pub fn add_marker(&mut self, point: &PointRecord) {
        let mut popup = format!("Point: {}, {}", point.lat, point.lon);

        for (k, v) in &point.attributes {
            popup.push_str(&format!("<br><b>{}</b>: {}", escape_html(k),
                                    escape_html(v)));
        }

        self.markers.push(Marker {
            lat: point.lat,
            lon: point.lon,
            popup: popup,
        });
    }

    pub fn add_circle(&mut self, lat: f64, lon: f64, radius: f64) {
        self.circles.push(CircleOverlay {
            lat: lat,
            lon: lon,
            radius: radius,
            color: "blue".to_string(),
            fill_opacity: 0.4,
        });
    }

    // One feature per polygon of the back-projected union
    pub fn add_union(&mut self, coverage: &Coverage) {
        let features = coverage.geographic.0.iter()
            .map(|p| Feature::from(Value::from(p)))
            .collect();

        self.union = Some(FeatureCollection {
            bbox: None,
            features: features,
            foreign_members: None,
        });
    }

    pub fn set_area_annotation(&mut self, area_m2: f64) {
        self.annotation = Some(area_summary(area_m2));
    }

    pub fn add_layer_control(&mut self) {
        self.layer_control = true;
    }

    pub fn to_html(&self) -> Result<String, serde_json::Error> {
        // Keep the embedded JSON from closing the script element
        let data = serde_json::to_string(self)?.replace("</", "<\\/");
        let title = match &self.annotation {
            Some(a) => escape_html(a),
            None => "Coverage".to_string(),
        };

        Ok(MAP_TEMPLATE
           .replace("__TITLE__", &title)
           .replace("__MAP_DATA__", &data))
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }

    out
}

// Simple average of the coordinates, used as the initial view. This is not
// a centroid of the covered area.
pub fn map_center(lat_lon: &[(f64, f64)]) -> (f64, f64) {
    if lat_lon.is_empty() {
        return DEFAULT_CENTER;
    }

    let n = lat_lon.len() as f64;
    let (lat_sum, lon_sum) = lat_lon.iter()
        .fold((0.0, 0.0), |(a, b), (lat, lon)| (a + lat, b + lon));

    (lat_sum/n, lon_sum/n)
}

pub fn render_map(dataset: &Dataset, coverage: &Coverage, radius: f64,
                  zoom: u8) -> MapDocument {
    let mut doc = MapDocument::new(map_center(&dataset.lat_lon()), zoom);

    for p in &dataset.points {
        doc.add_marker(p);
        doc.add_circle(p.lat, p.lon, radius);
    }

    doc.set_area_annotation(coverage.area_m2);
    doc.add_union(coverage);
    doc.add_layer_control();

    debug!("Map: {} markers, {} union features, center {:?}",
           doc.markers.len(), doc.union_features(), doc.center);

    doc
}
