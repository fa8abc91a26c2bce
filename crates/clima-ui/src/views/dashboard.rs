use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph,
    },
    Frame,
};

use clima_weather::ChartPoint;

use crate::app::AppState;
use crate::models::{DashboardModel, LoadState};
use crate::views::band_color;

const TEMPERATURE_COLOR: Color = Color::Red;
const HEAT_INDEX_COLOR: Color = Color::Magenta;
const HUMIDITY_COLOR: Color = Color::Blue;
const VARIATION_COLOR: Color = Color::Yellow;

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let dashboard = &state.dashboard;

    match &dashboard.state {
        LoadState::Ready => render_ready(frame, state, area),
        LoadState::Failed(message) => render_message(frame, message, Color::Red, area),
        LoadState::Loading => render_progress(frame, dashboard, area),
        LoadState::Idle if state.neighborhoods.is_none() => {
            render_message(frame, "Loading neighborhoods…", Color::Gray, area)
        }
        LoadState::Idle => render_message(frame, "Press r to load the dashboard", Color::Gray, area),
    }
}

/// Progress gauge fed by the batch callback
pub fn render_progress(frame: &mut Frame, dashboard: &DashboardModel, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Fetching weather "),
        )
        .gauge_style(Style::default().fg(Color::Yellow).bg(Color::Black))
        .ratio(dashboard.progress_ratio())
        .label(dashboard.progress_label().unwrap_or_default());

    frame.render_widget(gauge, rows[1]);
}

pub fn render_message(frame: &mut Frame, message: &str, color: Color, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(color))),
    ])
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(paragraph, area);
}

fn render_ready(frame: &mut Frame, state: &AppState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(8),
        ])
        .split(area);

    render_cards(frame, state, rows[0]);
    render_chart(frame, &state.dashboard.points, state.dashboard.reference(), rows[1]);
    render_bars(frame, &state.dashboard.points, rows[2]);
}

fn render_cards(frame: &mut Frame, state: &AppState, area: Rect) {
    let Some(summary) = &state.dashboard.summary else {
        return;
    };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let card = |title: &str, value: String, detail: String, color: Color| {
        Paragraph::new(vec![
            Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(detail, Style::default().fg(Color::Gray))),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {} ", title)),
        )
    };

    frame.render_widget(
        card(
            "Avg temperature",
            format!("{:.1}°C", summary.avg_temperature),
            format!("{} neighborhoods", summary.count),
            band_color(summary.avg_temperature),
        ),
        columns[0],
    );
    frame.render_widget(
        card(
            "Avg humidity",
            format!("{:.0}%", summary.avg_humidity),
            "relative".to_string(),
            HUMIDITY_COLOR,
        ),
        columns[1],
    );
    frame.render_widget(
        card(
            "Avg heat index",
            format!("{:.1}°C", summary.avg_heat_index),
            "feels like".to_string(),
            HEAT_INDEX_COLOR,
        ),
        columns[2],
    );

    let period = state.config.ui.hottest_rotate_secs;
    let hottest = state.dashboard.hottest_at(state.elapsed_secs(), period);
    let (value, detail, color) = match hottest {
        Some((point, index, total)) => {
            let detail = if total > 1 {
                format!("{:.1}°C  {}/{}", point.temperature, index, total)
            } else {
                format!("{:.1}°C", point.temperature)
            };
            (point.name.clone(), detail, band_color(point.temperature))
        }
        None => ("-".to_string(), String::new(), Color::Gray),
    };
    frame.render_widget(card("Hottest", value, detail, color), columns[3]);
}

/// Temperature and heat index lines over the neighborhoods, coolest first
fn render_chart(frame: &mut Frame, points: &[ChartPoint], reference: f64, area: Rect) {
    let temperature: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.temperature))
        .collect();
    let heat_index: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.heat_index))
        .collect();
    let x_max = (points.len().max(2) - 1) as f64;
    let reference_line = vec![(0.0, reference), (x_max, reference)];

    let values = points.iter().flat_map(|p| [p.temperature, p.heat_index]);
    let low = values.clone().fold(reference, f64::min).floor() - 1.0;
    let high = values.fold(reference, f64::max).ceil() + 1.0;

    let datasets = vec![
        Dataset::default()
            .name("Reference")
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&reference_line),
        Dataset::default()
            .name("Temperature")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(TEMPERATURE_COLOR))
            .data(&temperature),
        Dataset::default()
            .name("Heat index")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(HEAT_INDEX_COLOR))
            .data(&heat_index),
    ];

    let first = points.first().map_or(String::new(), |p| p.name.clone());
    let last = points.last().map_or(String::new(), |p| p.name.clone());

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Temperature by neighborhood "),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(vec![first, last]),
        )
        .y_axis(
            Axis::default()
                .title("°C")
                .style(Style::default().fg(Color::Gray))
                .bounds([low, high])
                .labels(vec![
                    format!("{:.0}", low),
                    format!("{:.0}", (low + high) / 2.0),
                    format!("{:.0}", high),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Humidity and variation bars per neighborhood
fn render_bars(frame: &mut Frame, points: &[ChartPoint], area: Rect) {
    let groups: Vec<BarGroup> = points
        .iter()
        .map(|p| {
            BarGroup::default().bars(&[
                Bar::default()
                    .value(p.humidity.round().max(0.0) as u64)
                    .style(Style::default().fg(HUMIDITY_COLOR))
                    .text_value(String::new()),
                Bar::default()
                    .value((p.variation * 10.0).round().max(0.0) as u64)
                    .style(Style::default().fg(VARIATION_COLOR))
                    .text_value(String::new()),
            ])
        })
        .collect();

    let mut chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Line::from(vec![
                    Span::raw(" "),
                    Span::styled("humidity %", Style::default().fg(HUMIDITY_COLOR)),
                    Span::raw(" / "),
                    Span::styled("variation ×10", Style::default().fg(VARIATION_COLOR)),
                    Span::raw(" "),
                ])),
        )
        .bar_width(1)
        .bar_gap(0)
        .group_gap(1);

    for group in groups {
        chart = chart.data(group);
    }
    frame.render_widget(chart, area);
}
