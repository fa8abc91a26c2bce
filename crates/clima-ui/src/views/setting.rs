use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::AppState;
use crate::models::setting::setting_rows;

const LABEL_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for warning in &state.warnings {
        lines.push(Line::from(Span::styled(
            format!("⚠ {}", warning),
            Style::default().fg(Color::Yellow),
        )));
    }
    if !state.warnings.is_empty() {
        lines.push(Line::from(""));
    }

    for (section, rows) in setting_rows(&state.config) {
        lines.push(Line::from(Span::styled(
            section,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for (label, value) in rows {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<width$}", label, width = LABEL_WIDTH),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(value),
            ]));
        }
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Settings (read-only, edit config.toml) ");
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
