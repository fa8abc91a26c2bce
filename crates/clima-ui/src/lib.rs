//! Terminal pages for Clima: routing, per-page models, background services,
//! ratatui views and the HTML map export.

pub mod app;
pub mod app_services;
pub mod controller;
pub mod error_mapping;
pub mod export;
pub mod models;
pub mod routes;
pub mod services;
pub mod tui;
pub mod views;

pub use app::{Action, AppState};
pub use app_services::{fallback_neighborhoods, AppServices};
pub use controller::Controller;
pub use export::render_map_html;
pub use routes::Route;
