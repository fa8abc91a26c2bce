//! Header, sidebar and footer shared by every page.

use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::AppState;
use crate::routes::Route;

const SIDEBAR_WIDTH: u16 = 18;

pub struct Areas {
    pub header: Rect,
    pub sidebar: Rect,
    pub page: Rect,
    pub footer: Rect,
}

pub fn split(area: Rect) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Sidebar and page
            Constraint::Length(1), // Footer
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
        .split(rows[1]);

    Areas {
        header: rows[0],
        sidebar: body[0],
        page: body[1],
        footer: rows[2],
    }
}

/// Header date, e.g. `19 OCT`
pub fn date_label(date: NaiveDate) -> String {
    date.format("%d %b").to_string().to_uppercase()
}

pub fn render_header(frame: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let city = &state.config.city;
    let title = Line::from(vec![
        Span::styled(
            " Clima ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{}, {}", city.name, city.country)),
        Span::styled(
            format!("  {}", state.route.title()),
            Style::default().fg(Color::Gray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), inner);

    let date = Paragraph::new(Span::styled(
        format!("{} ", date_label(state.today)),
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Right);
    frame.render_widget(date, inner);
}

pub fn render_sidebar(frame: &mut Frame, state: &AppState, area: Rect) {
    let items: Vec<ListItem> = Route::ALL
        .iter()
        .enumerate()
        .map(|(i, route)| {
            let marker = if *route == state.route { "›" } else { " " };
            let style = if *route == state.route {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{}{}", marker, route.title()), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Pages "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn render_footer(frame: &mut Frame, state: &AppState, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let mut spans = vec![
        key(" ↑/↓"),
        Span::raw(" select  "),
        key("⏎"),
        Span::raw(" open  "),
        key("1-6"),
        Span::raw(" pages  "),
        key("r"),
        Span::raw(" refresh  "),
        key("c"),
        Span::raw(" clear cache  "),
        key("q"),
        Span::raw(" quit"),
    ];
    if let Some(status) = &state.status {
        spans.push(Span::styled(
            format!("  │ {}", status),
            Style::default().fg(Color::Gray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
