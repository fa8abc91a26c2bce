//! Self-contained HTML map with Leaflet markers and a heat layer.

use anyhow::{Context as _, Result};
use serde::Serialize;
use tera::{Context, Tera};

use clima_core::Config;
use clima_weather::bands::{color_for, HEAT_GRADIENT};
use clima_weather::{heat_intensity, NeighborhoodWeather};

use crate::models::home::{humidity_label, precipitation_label, temperature_label, wind_label};

const LEAFLET_VERSION: &str = "1.9.4";
const LEAFLET_HEAT_VERSION: &str = "0.2.0";

const MAP_TEMPLATE_NAME: &str = "map.html";
const MAP_TEMPLATE: &str = include_str!("../templates/map.html");

#[derive(Debug, Serialize)]
struct MarkerData {
    lat: f64,
    lon: f64,
    color: &'static str,
    label: String,
    name: String,
    /// Popup lines below the name; empty when the fetch failed
    details: Vec<String>,
}

/// Render the map page for `results`
///
/// Every string reaches the page through the template's autoescaping; only
/// the numeric heat points, the gradient and the center are emitted raw.
pub fn render_map_html(config: &Config, results: &[NeighborhoodWeather]) -> Result<String> {
    let city = &config.city;

    let temperatures: Vec<f64> = results.iter().filter_map(|r| r.temperature()).collect();
    let min = temperatures.iter().copied().fold(f64::INFINITY, f64::min);
    let max = temperatures.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let markers: Vec<MarkerData> = results.iter().map(marker_data).collect();
    let heat: Vec<[f64; 3]> = results
        .iter()
        .filter_map(|r| {
            r.temperature().map(|t| {
                [
                    r.neighborhood.lat,
                    r.neighborhood.lon,
                    heat_intensity(t, min, max),
                ]
            })
        })
        .collect();
    let gradient: serde_json::Map<String, serde_json::Value> = HEAT_GRADIENT
        .iter()
        .map(|(stop, color)| (stop.to_string(), serde_json::Value::from(*color)))
        .collect();

    let mut context = Context::new();
    context.insert("city", &city.name);
    context.insert("leaflet_version", LEAFLET_VERSION);
    context.insert("heat_version", LEAFLET_HEAT_VERSION);
    context.insert("tile_url", &config.services.tile_url);
    context.insert("center", &[city.center_lat, city.center_lon]);
    context.insert("zoom", &city.zoom);
    context.insert("markers", &markers);
    context.insert("heat", &heat);
    context.insert("gradient", &gradient);

    let mut tera = Tera::default();
    tera.add_raw_template(MAP_TEMPLATE_NAME, MAP_TEMPLATE)
        .context("Failed to compile map template")?;
    let html = tera
        .render(MAP_TEMPLATE_NAME, &context)
        .context("Failed to render map template")?;

    tracing::debug!(
        "Rendered map export with {} markers and {} heat points",
        markers.len(),
        heat.len()
    );
    Ok(html)
}

fn marker_data(result: &NeighborhoodWeather) -> MarkerData {
    let (color, label, details) = match &result.weather {
        Some(w) => (
            color_for(w.temperature),
            format!("{:.1}°", w.temperature),
            vec![
                format!(
                    "{}, {}",
                    temperature_label(w.temperature),
                    w.condition.description()
                ),
                format!("Feels like {}", temperature_label(w.feels_like)),
                format!("Humidity {}", humidity_label(w.humidity)),
                format!("Wind {}", wind_label(w.wind_speed)),
                format!("Rain {}", precipitation_label(w.precipitation)),
            ],
        ),
        None => ("#9CA3AF", "…".to_string(), Vec::new()),
    };

    MarkerData {
        lat: result.neighborhood.lat,
        lon: result.neighborhood.lon,
        color,
        label,
        name: result.neighborhood.name.clone(),
        details,
    }
}
