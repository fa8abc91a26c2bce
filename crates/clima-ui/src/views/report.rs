use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use clima_weather::bands::hex_to_rgb;

use crate::app::AppState;
use crate::models::report::names_with_temperature;
use crate::models::{Report, EMPTY_MESSAGE};
use crate::views::dashboard::{render_message, render_progress};

/// Widest band bar, in cells
const BAR_WIDTH: usize = 30;

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    if state.dashboard.state.is_loading() {
        render_progress(frame, &state.dashboard, area);
        return;
    }

    match state.report() {
        Some(report) if report.summary.is_some() => render_report(frame, &report, area),
        Some(_) => render_message(frame, EMPTY_MESSAGE, Color::Red, area),
        None => {
            let message = state
                .dashboard
                .state
                .error()
                .unwrap_or("Press r to build the report");
            render_message(frame, message, Color::Gray, area);
        }
    }
}

fn render_report(frame: &mut Frame, report: &Report, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    frame.render_widget(
        Paragraph::new(summary_lines(report))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(format!(" Report for {} ", report.city)),
            ),
        columns[0],
    );

    frame.render_widget(
        Paragraph::new(band_lines(report)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Bands "),
        ),
        columns[1],
    );
}

fn summary_lines(report: &Report) -> Vec<Line<'static>> {
    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Gray));
    let mut lines = vec![Line::from(vec![
        label("Neighborhoods  "),
        Span::raw(format!(
            "{} queried, {} with data, {} failed",
            report.total,
            report.with_data(),
            report.failed()
        )),
    ])];

    if let Some(summary) = &report.summary {
        lines.extend([
            Line::from(""),
            Line::from(vec![
                label("Temperature    "),
                Span::raw(format!("{:.1} °C", summary.avg_temperature)),
            ]),
            Line::from(vec![
                label("Humidity       "),
                Span::raw(format!("{:.0} %", summary.avg_humidity)),
            ]),
            Line::from(vec![
                label("Heat index     "),
                Span::raw(format!("{:.1} °C", summary.avg_heat_index)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Hottest",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(names_with_temperature(&summary.hottest)),
            Line::from(""),
            Line::from(Span::styled(
                "Coldest",
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            )),
            Line::from(names_with_temperature(&summary.coldest)),
        ]);
    }
    lines
}

fn band_lines(report: &Report) -> Vec<Line<'static>> {
    let most = report.bands.iter().map(|b| b.count).max().unwrap_or(0).max(1);

    report
        .bands
        .iter()
        .map(|band| {
            let color = hex_to_rgb(band.color).map_or(Color::Gray, |(r, g, b)| Color::Rgb(r, g, b));
            let width = (band.count * BAR_WIDTH).div_ceil(most);
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(color)),
                Span::raw(format!("{:<9}", band.label())),
                Span::raw(format!("{:>3} ", band.count)),
                Span::styled("█".repeat(width), Style::default().fg(color)),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use clima_core::Config;
    use clima_geo::Neighborhood;
    use clima_weather::{NeighborhoodWeather, WeatherCondition, WeatherSnapshot};

    use crate::app::AppState;
    use crate::routes::Route;
    use crate::views::test_support::render_text;

    fn result(name: &str, temperature: Option<f64>) -> NeighborhoodWeather {
        NeighborhoodWeather {
            neighborhood: Neighborhood::new(name, -3.1, -60.0),
            weather: temperature.map(|t| WeatherSnapshot {
                temperature: t,
                feels_like: t,
                humidity: 60.0,
                wind_speed: 1.0,
                pressure: 1010.0,
                precipitation: 0.0,
                symbol_code: "clearsky_day".into(),
                condition: WeatherCondition::Clear,
                updated_at: None,
                fetched_at: Utc::now(),
            }),
        }
    }

    fn state() -> AppState {
        let mut state = AppState::new(Arc::new(Config::default()), Vec::new());
        state.navigate(Route::Report);
        state
    }

    #[test]
    fn test_report_page_summary_and_bands() {
        let mut state = state();
        let request = state.dashboard.begin(3);
        state.dashboard.apply_results(
            request,
            vec![
                result("Centro", Some(33.0)),
                result("Flores", Some(27.0)),
                result("Aleixo", None),
            ],
        );

        let text = render_text(&state, 150, 36);
        assert!(text.contains("Report for Manaus"));
        assert!(text.contains("3 queried, 2 with data, 1 failed"));
        assert!(text.contains("30.0 °C"));
        assert!(text.contains("Centro (33.0 °C)"));
        assert!(text.contains("Flores (27.0 °C)"));
        assert!(text.contains("≥ 32 °C"));
        assert!(text.contains("< 23 °C"));
    }

    #[test]
    fn test_report_page_before_dashboard_loads() {
        let state = state();
        let text = render_text(&state, 150, 36);
        assert!(text.contains("Press r to build the report"));
    }

    #[test]
    fn test_report_page_shows_progress() {
        let mut state = state();
        let request = state.dashboard.begin(5);
        state.dashboard.apply_progress(request, 5, 5);

        let text = render_text(&state, 150, 36);
        assert!(text.contains("5 of 5 neighborhoods (100%)"));
    }
}
