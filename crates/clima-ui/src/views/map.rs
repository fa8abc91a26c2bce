use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};

use clima_weather::bands::{gradient_rgb, BANDS, COLDEST_COLOR};
use clima_weather::{NeighborhoodWeather, TemperatureLevel};

use crate::app::AppState;
use crate::models::{progress_label, HeatCell, MapModel};
use crate::views::{band_color, temperature_or_placeholder};

/// Intensity steps the heat layer is quantized to
const HEAT_STEPS: usize = 10;
const CARDS_WIDTH: u16 = 30;

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(CARDS_WIDTH)])
        .split(area);

    render_canvas(frame, state, columns[0]);
    render_side(frame, state, columns[1]);
}

fn render_canvas(frame: &mut Frame, state: &AppState, area: Rect) {
    let map = &state.map;
    let city = &state.config.city;
    let bounds = map.bounds((city.center_lat, city.center_lon));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", city.name));
    let inner = block.inner(area);

    let cells = map.heat_cells(&bounds, inner.width as usize, inner.height as usize);
    let layers = heat_layers(&cells);
    let markers: Vec<(f64, f64, Color, String)> = map
        .results
        .iter()
        .map(|r| {
            let color = r.temperature().map_or(Color::Gray, band_color);
            let label = format!(
                "{} {}",
                marker_glyph(r),
                temperature_or_placeholder(r.temperature())
            );
            (r.neighborhood.lon, r.neighborhood.lat, color, label)
        })
        .collect();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Block)
        .x_bounds([bounds.west, bounds.east])
        .y_bounds([bounds.south, bounds.north])
        .paint(move |ctx| {
            for (color, coords) in &layers {
                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: *color,
                });
            }
            ctx.layer();
            for (lon, lat, color, label) in &markers {
                ctx.print(
                    *lon,
                    *lat,
                    Span::styled(
                        label.clone(),
                        Style::default().fg(*color).add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });

    frame.render_widget(canvas, area);
}

/// Heat cells grouped into colored layers by quantized intensity
fn heat_layers(cells: &[HeatCell]) -> Vec<(Color, Vec<(f64, f64)>)> {
    let mut layers: Vec<Vec<(f64, f64)>> = vec![Vec::new(); HEAT_STEPS + 1];
    for cell in cells {
        let step = (cell.intensity * HEAT_STEPS as f64).round() as usize;
        layers[step.min(HEAT_STEPS)].push((cell.lon, cell.lat));
    }

    layers
        .into_iter()
        .enumerate()
        .filter(|(_, coords)| !coords.is_empty())
        .map(|(step, coords)| {
            let (r, g, b) = gradient_rgb(step as f64 / HEAT_STEPS as f64);
            (Color::Rgb(r, g, b), coords)
        })
        .collect()
}

/// Marker shape per temperature level
fn marker_glyph(result: &NeighborhoodWeather) -> &'static str {
    match result.temperature().map(TemperatureLevel::from_temperature) {
        Some(TemperatureLevel::Hot) => "▲",
        Some(TemperatureLevel::Warm) => "●",
        Some(TemperatureLevel::Cold) => "▼",
        None => "○",
    }
}

fn render_side(frame: &mut Frame, state: &AppState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(4),
        ])
        .split(area);

    let period = state.config.ui.extremes_rotate_secs;
    let (hottest, coldest) = state.map.extremes_at(state.elapsed_secs(), period);
    render_extreme(frame, "Hottest", hottest, rows[0]);
    render_extreme(frame, "Coldest", coldest, rows[1]);
    render_legend(frame, &state.map, rows[2]);
}

fn render_extreme(
    frame: &mut Frame,
    title: &str,
    entry: Option<(&NeighborhoodWeather, usize, usize)>,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", title));

    let lines = match entry {
        Some((result, index, total)) => {
            let temperature = result.temperature();
            let mut lines = vec![
                Line::from(Span::styled(
                    result.neighborhood.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    temperature_or_placeholder(temperature),
                    Style::default().fg(temperature.map_or(Color::Gray, band_color)),
                )),
            ];
            if total > 1 {
                lines.push(Line::from(Span::styled(
                    format!("{}/{} tied", index, total),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines
        }
        None => vec![Line::from(Span::styled("…", Style::default().fg(Color::Gray)))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_legend(frame: &mut Frame, map: &MapModel, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Legend ");

    let mut lines: Vec<Line> = Vec::new();
    if let Some((done, total)) = map.progress {
        lines.push(Line::from(Span::styled(
            progress_label(done, total),
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(message) = map.state.error() {
        lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let swatch = |hex: &str, text: String| {
        let color = clima_weather::bands::hex_to_rgb(hex)
            .map_or(Color::Gray, |(r, g, b)| Color::Rgb(r, g, b));
        Line::from(vec![
            Span::styled("■ ", Style::default().fg(color)),
            Span::raw(text),
        ])
    };
    for (lower, color) in BANDS {
        lines.push(swatch(color, format!("≥ {:.0} °C", lower)));
    }
    lines.push(swatch(
        COLDEST_COLOR,
        format!("< {:.0} °C", BANDS[BANDS.len() - 1].0),
    ));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use chrono::Utc;
    use clima_core::Config;
    use clima_geo::Neighborhood;
    use clima_weather::{WeatherCondition, WeatherSnapshot};

    use super::*;
    use crate::routes::Route;
    use crate::views::test_support::render_text;

    fn result(name: &str, lat: f64, lon: f64, temperature: Option<f64>) -> NeighborhoodWeather {
        NeighborhoodWeather {
            neighborhood: Neighborhood::new(name, lat, lon),
            weather: temperature.map(|t| WeatherSnapshot {
                temperature: t,
                feels_like: t,
                humidity: 70.0,
                wind_speed: 1.0,
                pressure: 1010.0,
                precipitation: 0.0,
                symbol_code: "cloudy".into(),
                condition: WeatherCondition::Cloudy,
                updated_at: None,
                fetched_at: Utc::now(),
            }),
        }
    }

    #[test]
    fn test_heat_layers_quantize() {
        let cells = [
            HeatCell { lon: 0.0, lat: 0.0, intensity: 0.0 },
            HeatCell { lon: 1.0, lat: 0.0, intensity: 0.04 },
            HeatCell { lon: 2.0, lat: 0.0, intensity: 1.0 },
        ];
        let layers = heat_layers(&cells);
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].1.len(), 2);
        assert_eq!(layers[0].0, Color::Rgb(0x3B, 0x82, 0xF6));
        assert_eq!(layers[1].0, Color::Rgb(0xDC, 0x26, 0x26));
    }

    #[test]
    fn test_marker_glyphs() {
        assert_eq!(marker_glyph(&result("A", 0.0, 0.0, Some(31.0))), "▲");
        assert_eq!(marker_glyph(&result("A", 0.0, 0.0, Some(27.0))), "●");
        assert_eq!(marker_glyph(&result("A", 0.0, 0.0, Some(24.0))), "▼");
        assert_eq!(marker_glyph(&result("A", 0.0, 0.0, None)), "○");
    }

    #[test]
    fn test_map_page_renders_extremes_and_legend() {
        let mut state = AppState::new(Arc::new(Config::default()), Vec::new());
        state.navigate(Route::Map);
        let results = vec![
            result("Centro", -3.13, -60.02, Some(32.5)),
            result("Ponta Negra", -3.06, -60.10, Some(26.5)),
        ];
        let neighborhoods: Vec<_> = results.iter().map(|r| r.neighborhood.clone()).collect();
        let request = state.map.begin(&neighborhoods);
        state.map.apply_results(request, results, Instant::now());

        let text = render_text(&state, 140, 40);
        assert!(text.contains("Hottest"));
        assert!(text.contains("Centro"));
        assert!(text.contains("Coldest"));
        assert!(text.contains("Ponta Negra"));
        assert!(text.contains("32.5°"));
        assert!(text.contains("≥ 34 °C"));
        assert!(text.contains("< 23 °C"));
    }

    #[test]
    fn test_map_page_while_loading() {
        let mut state = AppState::new(Arc::new(Config::default()), Vec::new());
        state.navigate(Route::Map);
        state.map.begin(&[Neighborhood::new("Centro", -3.13, -60.02)]);

        let text = render_text(&state, 140, 40);
        assert!(text.contains("0 of 1 neighborhoods (0%)"));
    }
}
