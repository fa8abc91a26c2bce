use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::AppState;
use crate::models::home::humidity_label;
use crate::models::{LogEntry, LogStatus};
use crate::views::{band_color, dashboard::render_message, temperature_or_placeholder};

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let log = &state.log;
    if log.entries.is_empty() {
        let message = if log.is_idle() {
            "Press r to look up the neighborhoods"
        } else {
            "No neighborhoods configured for the log"
        };
        render_message(frame, message, Color::Gray, area);
        return;
    }

    let header = Row::new(["Neighborhood", "Coordinates", "Temp", "Humidity", "Sky", "Status"])
        .style(
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        );

    let rows: Vec<Row> = log.entries.iter().map(entry_row).collect();
    let widths = [
        Constraint::Length(16),
        Constraint::Length(19),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Min(12),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(
                " Neighborhood log {}/{} ",
                log.resolved(),
                log.entries.len()
            )),
    );

    frame.render_widget(table, area);
}

fn entry_row(entry: &LogEntry) -> Row<'static> {
    let name = Cell::from(entry.name.clone());
    match &entry.status {
        LogStatus::Pending => Row::new(vec![
            name,
            Cell::from(""),
            Cell::from(temperature_or_placeholder(None)),
            Cell::from(""),
            Cell::from(""),
            Cell::from(Span::styled("looking up…", Style::default().fg(Color::Yellow))),
        ]),
        LogStatus::Ready {
            coordinates,
            weather,
        } => {
            let location = format!("{:.4}, {:.4}", coordinates.lat, coordinates.lon);
            match weather {
                Some(weather) => Row::new(vec![
                    name,
                    Cell::from(location),
                    Cell::from(Span::styled(
                        temperature_or_placeholder(Some(weather.temperature)),
                        Style::default().fg(band_color(weather.temperature)),
                    )),
                    Cell::from(humidity_label(weather.humidity)),
                    Cell::from(weather.condition.description()),
                    Cell::from(Span::styled("ok", Style::default().fg(Color::Green))),
                ]),
                None => Row::new(vec![
                    name,
                    Cell::from(location),
                    Cell::from(temperature_or_placeholder(None)),
                    Cell::from(""),
                    Cell::from(""),
                    Cell::from(Span::styled("no weather", Style::default().fg(Color::Yellow))),
                ]),
            }
        }
        LogStatus::Failed(message) => Row::new(vec![
            name,
            Cell::from(""),
            Cell::from(""),
            Cell::from(""),
            Cell::from(""),
            Cell::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
        ]),
    }
}
