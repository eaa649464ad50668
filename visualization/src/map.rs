use crate::errors::MapError;
use common::types::{RouteSet, TravelMode};
use log::info;
use serde::Serialize;
use std::fs;
use std::path::Path;

const ZOOM: u8 = 13;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>

  <!-- Leaflet 1.9.4 -->
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous"
    referrerpolicy="no-referrer" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"
    referrerpolicy="no-referrer"></script>

  <style>
    html, body { height: 100%; margin: 0; }
    #map { height: 100%; width: 100%; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
    const scene = {{SCENE}};

    const map = L.map('map').setView(scene.center, scene.zoom);
    L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
      maxZoom: 19,
      attribution: '&copy; OpenStreetMap contributors'
    }).addTo(map);

    for (const route of scene.routes) {
      L.marker(route[0]).bindPopup('Start').addTo(map);
      L.polyline(route, {color: 'blue', weight: 10, opacity: 0.7}).addTo(map);
    }
  </script>
</body>
</html>
"#;

/// Everything the page script needs, coordinates as Leaflet `[lat, lng]` pairs
#[derive(Serialize)]
struct Scene {
    center: [f64; 2],
    zoom: u8,
    routes: Vec<Vec<[f64; 2]>>,
}

fn scene(route_set: &RouteSet) -> Result<Scene, MapError> {
    let routes: Vec<Vec<[f64; 2]>> = route_set
        .iter()
        .filter(|route| !route.is_empty())
        .map(|route| route.0.iter().map(|c| [c.lat, c.lng]).collect())
        .collect();

    let center = *routes
        .first()
        .and_then(|route| route.first())
        .ok_or(MapError::EmptyRouteSet)?;

    Ok(Scene { center, zoom: ZOOM, routes })
}

fn page(route_set: &RouteSet, mode: TravelMode) -> Result<String, MapError> {
    let scene = serde_json::to_string(&scene(route_set)?)?;
    Ok(TEMPLATE
        .replace("{{TITLE}}", &format!("Routes ({mode})"))
        .replace("{{SCENE}}", &scene))
}

/// Draw every route of the set onto an OpenStreetMap base layer and save the result as a
/// self-contained HTML page.
pub fn render(route_set: &RouteSet, mode: TravelMode, output: &Path) -> Result<(), MapError> {
    let html = page(route_set, mode)?;
    fs::write(output, html)?;
    info!(target: "visualization", "Map with {} routes saved to {}", route_set.len(), output.display());
    Ok(())
}
