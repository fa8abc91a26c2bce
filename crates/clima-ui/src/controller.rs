//! Glue between the page state and the background services.
//!
//! The controller starts service requests for the current page, drains the
//! service channels on the UI thread, and runs the periodic map refresh.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crate::app::{Action, AppState};
use crate::app_services::AppServices;
use crate::models::home::region_sources;
use crate::models::DashboardModel;
use crate::routes::Route;
use crate::services::{
    request_batch, request_current, request_lookups, request_neighborhoods, BatchTarget,
    LogServiceMessage, NeighborhoodServiceMessage, WeatherServiceMessage,
};

pub struct Controller {
    pub state: AppState,
    services: AppServices,
    neighborhood_tx: Sender<NeighborhoodServiceMessage>,
    neighborhood_rx: Receiver<NeighborhoodServiceMessage>,
    weather_tx: Sender<WeatherServiceMessage>,
    weather_rx: Receiver<WeatherServiceMessage>,
    log_tx: Sender<LogServiceMessage>,
    log_rx: Receiver<LogServiceMessage>,
    /// Pages waiting for the neighborhood list, and whether to force them
    pending: Vec<(Route, bool)>,
    neighborhoods_requested: bool,
    /// The list in `state.neighborhoods` is the configured fallback
    neighborhoods_fallback: bool,
}

impl Controller {
    pub fn new(services: AppServices, warnings: Vec<String>) -> Self {
        let config = services.shared_config();
        let (neighborhood_tx, neighborhood_rx) = mpsc::channel();
        let (weather_tx, weather_rx) = mpsc::channel();
        let (log_tx, log_rx) = mpsc::channel();

        Self {
            state: AppState::new(config, warnings),
            services,
            neighborhood_tx,
            neighborhood_rx,
            weather_tx,
            weather_rx,
            log_tx,
            log_rx,
            pending: Vec::new(),
            neighborhoods_requested: false,
            neighborhoods_fallback: false,
        }
    }

    pub fn services(&self) -> &AppServices {
        &self.services
    }

    /// Kick off neighborhood discovery and load the start page
    pub fn start(&mut self) {
        self.request_neighborhoods();
        self.ensure_loaded(self.state.route, false);
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Quit => {
                tracing::info!("Quit requested");
                self.state.running = false;
            }
            Action::Navigate(route) => {
                self.state.navigate(route);
                self.ensure_loaded(route, false);
            }
            Action::Refresh => {
                let route = self.state.route;
                self.state.set_status(format!("Refreshing {}", route.title()));
                if self.neighborhoods_fallback {
                    self.forget_neighborhoods();
                }
                self.ensure_loaded(route, true);
            }
            Action::ClearCache => {
                self.services.weather().clear_cache();
                self.state.set_status("Weather cache cleared");
            }
        }
    }

    /// Start the requests `route` needs. Without `force`, pages that already
    /// hold data (or are loading it) are left alone.
    pub fn ensure_loaded(&mut self, route: Route, force: bool) {
        match route {
            Route::Setting => {}
            Route::Log => {
                if force || self.state.log.is_idle() {
                    let names = self.state.config.log.neighborhoods.clone();
                    let request = self.state.log.begin(&names);
                    request_lookups(&self.log_tx, &self.services, request, names);
                }
            }
            Route::Home => {
                if force || self.state.home.state.is_idle() {
                    let city = &self.state.config.city;
                    let (lat, lon) = (city.center_lat, city.center_lon);
                    let request = self.state.home.begin();
                    request_current(&self.weather_tx, &self.services, request, lat, lon);
                }
                if let Some(neighborhoods) = self.neighborhoods_for(route, force) {
                    if force || self.state.home.regions_state.is_idle() {
                        let regions = region_sources(&neighborhoods);
                        let request = self.state.home.begin_regions(&regions);
                        request_batch(
                            &self.weather_tx,
                            &self.services,
                            BatchTarget::Regions,
                            request,
                            regions,
                        );
                    }
                }
            }
            Route::Dashboard | Route::Report => {
                let Some(neighborhoods) = self.neighborhoods_for(route, force) else {
                    return;
                };
                let dashboard = &self.state.dashboard;
                if force || dashboard.state.is_idle() {
                    let targets = DashboardModel::targets(
                        &neighborhoods,
                        self.state.config.city.neighborhood_limit,
                    );
                    let request = self.state.dashboard.begin(targets.len());
                    request_batch(
                        &self.weather_tx,
                        &self.services,
                        BatchTarget::Dashboard,
                        request,
                        targets,
                    );
                }
            }
            Route::Map => {
                let Some(neighborhoods) = self.neighborhoods_for(route, force) else {
                    return;
                };
                if force || self.state.map.state.is_idle() {
                    let request = self.state.map.begin(&neighborhoods);
                    request_batch(
                        &self.weather_tx,
                        &self.services,
                        BatchTarget::Map,
                        request,
                        neighborhoods,
                    );
                }
            }
        }
    }

    /// Neighborhoods if known; otherwise queue `route` until they arrive
    fn neighborhoods_for(&mut self, route: Route, force: bool) -> Option<Vec<clima_geo::Neighborhood>> {
        if let Some(neighborhoods) = &self.state.neighborhoods {
            return Some(neighborhoods.clone());
        }
        match self.pending.iter_mut().find(|(queued, _)| *queued == route) {
            Some((_, queued_force)) => *queued_force |= force,
            None => self.pending.push((route, force)),
        }
        self.request_neighborhoods();
        None
    }

    /// Drop the fallback list so the next page load asks Overpass again
    fn forget_neighborhoods(&mut self) {
        tracing::info!("Retrying neighborhood discovery");
        self.state.neighborhoods = None;
        self.neighborhoods_requested = false;
        self.neighborhoods_fallback = false;
    }

    fn request_neighborhoods(&mut self) {
        if self.neighborhoods_requested {
            return;
        }
        self.neighborhoods_requested = true;
        self.state.set_status("Loading neighborhoods…");
        request_neighborhoods(&self.neighborhood_tx, &self.services);
    }

    /// Apply every queued service message; returns how many were handled
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;

        while let Ok(message) = self.neighborhood_rx.try_recv() {
            handled += 1;
            match message {
                NeighborhoodServiceMessage::Loaded(list) => {
                    let count = list.neighborhoods.len();
                    if list.is_fallback {
                        self.state
                            .set_status(format!("{} neighborhoods (fallback list)", count));
                    } else {
                        self.state.set_status(format!("{} neighborhoods", count));
                    }
                    self.neighborhoods_fallback = list.is_fallback;
                    self.state.neighborhoods = Some(list.neighborhoods);
                    for (route, force) in std::mem::take(&mut self.pending) {
                        self.ensure_loaded(route, force);
                    }
                }
            }
        }

        while let Ok(message) = self.weather_rx.try_recv() {
            handled += 1;
            self.apply_weather(message);
        }

        while let Ok(message) = self.log_rx.try_recv() {
            handled += 1;
            match message {
                LogServiceMessage::EntryDone {
                    request,
                    index,
                    result,
                } => self.state.log.apply(request, index, result),
            }
        }

        handled
    }

    fn apply_weather(&mut self, message: WeatherServiceMessage) {
        match message {
            WeatherServiceMessage::CurrentDone { request, result } => {
                self.state.home.apply_current(request, result);
            }
            WeatherServiceMessage::BatchProgress {
                target,
                request,
                done,
                total,
            } => match target {
                BatchTarget::Dashboard => self.state.dashboard.apply_progress(request, done, total),
                BatchTarget::Map => self.state.map.apply_progress(request, done, total),
                BatchTarget::Regions => {}
            },
            WeatherServiceMessage::BatchDone {
                target,
                request,
                results,
            } => match target {
                BatchTarget::Regions => self.state.home.apply_regions(request, results),
                BatchTarget::Dashboard => self.state.dashboard.apply_results(request, results),
                BatchTarget::Map => self.state.map.apply_results(request, results, Instant::now()),
            },
        }
    }

    /// Periodic work: date rollover and the map refresh
    pub fn tick(&mut self, now: Instant) {
        self.state.today = chrono::Local::now().date_naive();

        let every = Duration::from_secs(u64::from(self.state.config.weather.refresh_minutes) * 60);
        if self.state.route == Route::Map && self.state.map.needs_refresh(now, every) {
            tracing::info!("Refreshing map temperatures");
            self.ensure_loaded(Route::Map, true);
        }
    }

    pub fn shutdown(&mut self) {
        self.state.running = false;
        self.services.shutdown();
    }
}
