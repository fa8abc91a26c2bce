//! Application state shared by every page, and key handling.

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use clima_core::Config;
use clima_geo::Neighborhood;

use crate::models::{DashboardModel, HomeModel, LogModel, MapModel, Report};
use crate::routes::Route;

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Navigate(Route),
    /// Re-fetch the current page's data
    Refresh,
    ClearCache,
}

pub struct AppState {
    pub route: Route,
    /// Highlighted sidebar entry
    pub selected: usize,
    pub running: bool,
    /// Footer status message
    pub status: Option<String>,
    pub config: Arc<Config>,
    /// Configuration warnings collected at startup
    pub warnings: Vec<String>,
    /// `None` until the first neighborhood lookup completes
    pub neighborhoods: Option<Vec<Neighborhood>>,
    pub home: HomeModel,
    pub dashboard: DashboardModel,
    pub map: MapModel,
    pub log: LogModel,
    pub today: NaiveDate,
    started: Instant,
}

impl AppState {
    pub fn new(config: Arc<Config>, warnings: Vec<String>) -> Self {
        let reference = config.weather.reference_temperature;
        Self {
            route: Route::Home,
            selected: 0,
            running: true,
            status: None,
            config,
            warnings,
            neighborhoods: None,
            home: HomeModel::default(),
            dashboard: DashboardModel::new(reference),
            map: MapModel::default(),
            log: LogModel::default(),
            today: chrono::Local::now().date_naive(),
            started: Instant::now(),
        }
    }

    /// Translate a key press into an action, updating the sidebar selection
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }

        let count = Route::ALL.len();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = (self.selected + count - 1) % count;
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % count;
                Action::None
            }
            KeyCode::Enter => Route::from_index(self.selected).map_or(Action::None, Action::Navigate),
            KeyCode::Char(c @ '1'..='6') => {
                let index = (c as u8 - b'1') as usize;
                Route::from_index(index).map_or(Action::None, Action::Navigate)
            }
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('c') => Action::ClearCache,
            _ => Action::None,
        }
    }

    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            tracing::debug!("Navigating to {}", route.path());
        }
        self.route = route;
        self.selected = route.index();
    }

    /// Seconds since startup; drives the rotating cards
    pub fn elapsed_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    /// Report over the last dashboard aggregate
    pub fn report(&self) -> Option<Report> {
        if self.dashboard.results.is_empty() {
            return None;
        }
        Some(Report::build(
            &self.config.city.name,
            &self.dashboard.results,
            self.dashboard.reference(),
        ))
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state() -> AppState {
        AppState::new(Arc::new(Config::default()), Vec::new())
    }

    #[test]
    fn test_selection_wraps() {
        let mut state = state();
        assert_eq!(state.handle_key(press(KeyCode::Up)), Action::None);
        assert_eq!(state.selected, 5);
        state.handle_key(press(KeyCode::Char('j')));
        assert_eq!(state.selected, 0);
        state.handle_key(press(KeyCode::Down));
        assert_eq!(state.handle_key(press(KeyCode::Enter)), Action::Navigate(Route::Dashboard));
    }

    #[test]
    fn test_number_keys_navigate() {
        let mut state = state();
        assert_eq!(state.handle_key(press(KeyCode::Char('3'))), Action::Navigate(Route::Map));
        assert_eq!(state.handle_key(press(KeyCode::Char('6'))), Action::Navigate(Route::Report));
        assert_eq!(state.handle_key(press(KeyCode::Char('7'))), Action::None);
    }

    #[test]
    fn test_commands() {
        let mut state = state();
        assert_eq!(state.handle_key(press(KeyCode::Char('r'))), Action::Refresh);
        assert_eq!(state.handle_key(press(KeyCode::Char('c'))), Action::ClearCache);
        assert_eq!(state.handle_key(press(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(state.handle_key(press(KeyCode::Esc)), Action::Quit);
        assert_eq!(
            state.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_navigate_moves_selection() {
        let mut state = state();
        state.navigate(Route::Log);
        assert_eq!(state.route, Route::Log);
        assert_eq!(state.selected, 4);
    }

    #[test]
    fn test_report_needs_results() {
        assert!(state().report().is_none());
    }
}
