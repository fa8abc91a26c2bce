//! ratatui rendering. Views read the app state and never mutate it.

pub mod dashboard;
pub mod home;
pub mod layout;
pub mod log;
pub mod map;
pub mod report;
pub mod setting;

use ratatui::style::Color;
use ratatui::Frame;

use crate::app::AppState;
use crate::routes::Route;

/// Draw the whole screen for the current route
pub fn render(frame: &mut Frame, state: &AppState) {
    let areas = layout::split(frame.area());

    layout::render_header(frame, state, areas.header);
    layout::render_sidebar(frame, state, areas.sidebar);
    layout::render_footer(frame, state, areas.footer);

    match state.route {
        Route::Home => home::render(frame, state, areas.page),
        Route::Dashboard => dashboard::render(frame, state, areas.page),
        Route::Map => map::render(frame, state, areas.page),
        Route::Setting => setting::render(frame, state, areas.page),
        Route::Log => log::render(frame, state, areas.page),
        Route::Report => report::render(frame, state, areas.page),
    }
}

/// Terminal color of a temperature band
pub fn band_color(temperature: f64) -> Color {
    let (r, g, b) = clima_weather::bands::rgb_for(temperature);
    Color::Rgb(r, g, b)
}

pub fn temperature_or_placeholder(temperature: Option<f64>) -> String {
    temperature.map_or_else(|| "…".to_string(), |t| format!("{:.1}°", t))
}
