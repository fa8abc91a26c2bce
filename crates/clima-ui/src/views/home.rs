use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use clima_weather::{NeighborhoodWeather, WeatherSnapshot};

use crate::app::AppState;
use crate::models::home::{
    humidity_label, precipitation_label, pressure_label, temperature_label, wind_label,
    REGION_CARDS,
};
use crate::views::{band_color, temperature_or_placeholder};

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(6)])
        .split(area);

    render_current(frame, state, rows[0]);
    render_regions(frame, &state.home.regions, rows[1]);
}

fn render_current(frame: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Now in {} ", state.config.city.name));

    let home = &state.home;
    let lines = match (&home.current, home.state.error()) {
        (Some(current), _) => current_lines(current, home.temperature_range()),
        (None, Some(error)) => vec![
            Line::from(Span::styled(error.to_string(), Style::default().fg(Color::Red))),
            Line::from(Span::styled("Press r to retry", Style::default().fg(Color::DarkGray))),
        ],
        (None, None) => vec![Line::from("Loading current conditions…")],
    };

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn current_lines(current: &WeatherSnapshot, range: Option<(f64, f64)>) -> Vec<Line<'static>> {
    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Gray));
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                temperature_label(current.temperature),
                Style::default()
                    .fg(band_color(current.temperature))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  {} {}",
                current.condition.icon_name(),
                current.condition.description()
            )),
        ]),
        Line::from(vec![
            label("Feels like  "),
            Span::raw(temperature_label(current.feels_like)),
        ]),
    ];

    if let Some((min, max)) = range {
        lines.push(Line::from(vec![
            label("Min / Max   "),
            Span::raw(format!("{} / {}", temperature_label(min), temperature_label(max))),
        ]));
    }

    lines.extend([
        Line::from(vec![label("Humidity    "), Span::raw(humidity_label(current.humidity))]),
        Line::from(vec![label("Wind        "), Span::raw(wind_label(current.wind_speed))]),
        Line::from(vec![label("Pressure    "), Span::raw(pressure_label(current.pressure))]),
        Line::from(vec![
            label("Rain (1h)   "),
            Span::raw(precipitation_label(current.precipitation)),
        ]),
    ]);

    if let Some(updated) = current.updated_at {
        lines.push(Line::from(Span::styled(
            format!("Model run {}", updated.format("%H:%M UTC")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn render_regions(frame: &mut Frame, regions: &[NeighborhoodWeather], area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, REGION_CARDS as u32); REGION_CARDS])
        .split(area);

    for (i, column) in columns.iter().enumerate() {
        let Some(region) = regions.get(i) else {
            continue;
        };
        let color = region.temperature().map_or(Color::Gray, band_color);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", region.neighborhood.name));

        let mut lines = vec![Line::from(Span::styled(
            temperature_or_placeholder(region.temperature()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        if let Some(weather) = &region.weather {
            lines.push(Line::from(weather.condition.description()));
            lines.push(Line::from(Span::styled(
                humidity_label(weather.humidity),
                Style::default().fg(Color::Gray),
            )));
        }

        frame.render_widget(
            Paragraph::new(lines).block(block).alignment(Alignment::Center),
            *column,
        );
    }
}
