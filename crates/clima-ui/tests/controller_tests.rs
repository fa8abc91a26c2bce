//! End-to-end tests for the page controller against mocked services.
//!
//! The controller owns its runtime, so these are plain tests; the mock
//! server is started on a separate helper runtime.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clima_core::Config;
use clima_ui::services::fetch_city_weather;
use clima_ui::{Action, AppServices, AppState, Controller, Route};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn forecast(temperature: f64) -> serde_json::Value {
    serde_json::json!({
        "type": "Feature",
        "properties": {
            "meta": { "updated_at": "2026-10-19T12:00:00Z" },
            "timeseries": [{
                "time": "2026-10-19T12:00:00Z",
                "data": {
                    "instant": { "details": {
                        "air_temperature": temperature,
                        "relative_humidity": 72.0,
                        "wind_speed": 2.1,
                        "air_pressure_at_sea_level": 1010.0
                    } },
                    "next_1_hours": {
                        "summary": { "symbol_code": "cloudy" },
                        "details": { "precipitation_amount": 0.2 }
                    }
                }
            }]
        }
    })
}

fn overpass_body() -> serde_json::Value {
    serde_json::json!({
        "version": 0.6,
        "elements": [
            { "type": "node", "id": 1, "lat": -3.1316, "lon": -60.0233, "tags": { "name": "Centro", "place": "suburb" } },
            { "type": "node", "id": 2, "lat": -3.0890, "lon": -59.9930, "tags": { "name": "Aleixo", "place": "neighbourhood" } },
            { "type": "node", "id": 3, "lat": -3.0937, "lon": -60.0215, "tags": { "name": "Flores", "place": "suburb" } }
        ]
    })
}

struct Harness {
    /// Helper runtime for starting and mounting mocks
    runtime: tokio::runtime::Runtime,
    server: MockServer,
}

impl Harness {
    fn new() -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        Self {
            runtime,
            server,
        }
    }

    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    fn config(&self) -> Config {
        let uri = self.server.uri();
        let mut config = Config::default();
        config.services.overpass_url = format!("{}/api/interpreter", uri);
        config.services.forecast_url = format!("{}/weatherapi/locationforecast/2.0/compact", uri);
        config.services.nominatim_url = uri;
        config.weather.max_attempts = 1;
        config.weather.backoff_step_ms = 1;
        config.weather.batch_pause_ms = 0;
        config.weather.max_jitter_ms = 0;
        config.log.neighborhoods = vec!["Centro".to_string(), "Atlantis".to_string()];
        config
    }

    fn mount_defaults(&self, overpass_status: u16) {
        let overpass = if overpass_status == 200 {
            ResponseTemplate::new(200).set_body_json(overpass_body())
        } else {
            ResponseTemplate::new(overpass_status)
        };
        self.mount(
            Mock::given(method("GET"))
                .and(path("/api/interpreter"))
                .respond_with(overpass),
        );
        self.mount_forecast();
    }

    fn mount_forecast(&self) {
        self.mount(
            Mock::given(method("GET"))
                .and(path("/weatherapi/locationforecast/2.0/compact"))
                .respond_with(ResponseTemplate::new(200).set_body_json(forecast(30.4))),
        );
    }

    fn overpass_requests(&self) -> usize {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == "/api/interpreter")
            .count()
    }

    fn controller(&self) -> Controller {
        self.controller_with(self.config())
    }

    fn controller_with(&self, config: Config) -> Controller {
        let services = AppServices::new(Arc::new(config)).unwrap();
        Controller::new(services, Vec::new())
    }
}

fn neighborhood_names(state: &AppState) -> Vec<String> {
    state
        .neighborhoods
        .iter()
        .flatten()
        .map(|n| n.name.clone())
        .collect()
}

fn dashboard_names(state: &AppState) -> Vec<String> {
    state
        .dashboard
        .results
        .iter()
        .map(|r| r.neighborhood.name.clone())
        .collect()
}

/// Drain the controller until `done` holds or a few seconds pass
fn wait_until(controller: &mut Controller, done: impl Fn(&AppState) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        controller.drain();
        if done(&controller.state) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    false
}

#[test]
fn test_home_loads_current_and_regions() {
    let harness = Harness::new();
    harness.mount_defaults(200);

    let mut controller = harness.controller();
    controller.start();

    let loaded = wait_until(&mut controller, |s| {
        s.home.current.is_some()
            && !s.home.regions.is_empty()
            && s.home.regions.iter().all(|r| r.weather.is_some())
    });
    assert!(loaded, "home page never finished loading");

    let state = &controller.state;
    assert_eq!(state.home.current.as_ref().map(|w| w.temperature), Some(30.4));
    let (min, max) = state.home.temperature_range().unwrap();
    assert!((min - 27.4).abs() < 1e-9);
    assert!((max - 32.4).abs() < 1e-9);
    let regions: Vec<_> = state
        .home
        .regions
        .iter()
        .map(|r| r.neighborhood.name.as_str())
        .collect();
    assert_eq!(regions, vec!["Aleixo", "Centro", "Flores"]);

    controller.shutdown();
}

#[test]
fn test_dashboard_aggregates_every_neighborhood() {
    let harness = Harness::new();
    harness.mount_defaults(200);

    let mut controller = harness.controller();
    controller.start();
    controller.dispatch(Action::Navigate(Route::Dashboard));

    let ready = wait_until(&mut controller, |s| s.dashboard.summary.is_some());
    assert!(ready, "dashboard never became ready");

    let dashboard = &controller.state.dashboard;
    assert_eq!(dashboard.points.len(), 3);
    assert!(dashboard.progress.is_none());
    let summary = dashboard.summary.as_ref().unwrap();
    assert_eq!(summary.count, 3);
    assert!((summary.avg_temperature - 30.4).abs() < 1e-9);

    let report = controller.state.report().unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(report.failed(), 0);

    controller.shutdown();
}

#[test]
fn test_overpass_failure_uses_fallback() {
    let harness = Harness::new();
    harness.mount_defaults(500);

    let mut controller = harness.controller();
    controller.start();

    let loaded = wait_until(&mut controller, |s| s.neighborhoods.is_some());
    assert!(loaded, "neighborhoods never arrived");

    let names: Vec<String> = controller
        .state
        .neighborhoods
        .as_ref()
        .unwrap()
        .iter()
        .map(|n| n.name.clone())
        .collect();
    assert_eq!(names, vec!["Centro", "Adrianópolis", "Aleixo"]);

    controller.shutdown();
}

#[test]
fn test_refresh_after_fallback_queries_overpass_again() {
    let harness = Harness::new();
    harness.mount(
        Mock::given(method("GET"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1),
    );
    harness.mount(
        Mock::given(method("GET"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(overpass_body())),
    );
    harness.mount_forecast();

    let mut controller = harness.controller();
    controller.start();
    controller.dispatch(Action::Navigate(Route::Dashboard));

    let fallback = wait_until(&mut controller, |s| {
        s.dashboard.summary.is_some() && dashboard_names(s).contains(&"Adrianópolis".to_string())
    });
    assert!(fallback, "dashboard never loaded the fallback list");
    assert_eq!(
        neighborhood_names(&controller.state),
        vec!["Centro", "Adrianópolis", "Aleixo"]
    );

    controller.dispatch(Action::Refresh);
    let discovered = wait_until(&mut controller, |s| {
        s.dashboard.summary.is_some() && dashboard_names(s).contains(&"Flores".to_string())
    });
    assert!(discovered, "refresh never replaced the fallback list");
    assert_eq!(
        neighborhood_names(&controller.state),
        vec!["Aleixo", "Centro", "Flores"]
    );
    assert_eq!(harness.overpass_requests(), 2);

    controller.shutdown();
}

#[test]
fn test_refresh_keeps_discovered_neighborhoods() {
    let harness = Harness::new();
    harness.mount_defaults(200);

    let mut controller = harness.controller();
    controller.start();
    controller.dispatch(Action::Navigate(Route::Dashboard));
    assert!(wait_until(&mut controller, |s| s.dashboard.summary.is_some()));

    controller.dispatch(Action::Refresh);
    assert!(controller.state.neighborhoods.is_some());
    assert!(wait_until(&mut controller, |s| s.dashboard.summary.is_some()
        && s.dashboard.progress.is_none()));
    assert_eq!(harness.overpass_requests(), 1);

    controller.shutdown();
}

#[test]
fn test_home_reports_timeout() {
    let harness = Harness::new();
    harness.mount(
        Mock::given(method("GET"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(overpass_body())),
    );
    harness.mount(
        Mock::given(method("GET"))
            .and(path("/weatherapi/locationforecast/2.0/compact"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(forecast(30.4))
                    .set_delay(Duration::from_secs(5)),
            ),
    );

    let mut config = harness.config();
    config.services.request_timeout_secs = 1;
    let mut controller = harness.controller_with(config);
    controller.start();

    let failed = wait_until(&mut controller, |s| s.home.state.error().is_some());
    assert!(failed, "home never reported the timeout");
    assert_eq!(
        controller.state.home.state.error(),
        Some("The request timed out. Please try again.")
    );

    controller.shutdown();
}

#[test]
fn test_log_resolves_known_names_and_reports_misses() {
    let harness = Harness::new();
    harness.mount_defaults(200);
    harness.mount(
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Centro, Manaus, Brasil"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "lat": "-3.1316", "lon": "-60.0233", "display_name": "Centro, Manaus" }
            ]))),
    );
    harness.mount(
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([]))),
    );

    let mut controller = harness.controller();
    controller.dispatch(Action::Navigate(Route::Log));

    let done = wait_until(&mut controller, |s| {
        !s.log.entries.is_empty() && !s.log.is_loading()
    });
    assert!(done, "log lookups never finished");

    let entries = &controller.state.log.entries;
    assert_eq!(entries.len(), 2);
    match &entries[0].status {
        clima_ui::models::LogStatus::Ready {
            coordinates,
            weather,
        } => {
            assert_eq!(coordinates.lat, -3.1316);
            assert_eq!(weather.as_ref().map(|w| w.temperature), Some(30.4));
        }
        other => panic!("unexpected status {:?}", other),
    }
    assert_eq!(
        entries[1].status,
        clima_ui::models::LogStatus::Failed(
            "Place not found. Check the name and try again.".to_string()
        )
    );

    controller.shutdown();
}

#[test]
fn test_clear_cache_sets_status() {
    let harness = Harness::new();
    let mut controller = harness.controller();

    controller.dispatch(Action::ClearCache);
    assert_eq!(
        controller.state.status.as_deref(),
        Some("Weather cache cleared")
    );

    controller.dispatch(Action::Quit);
    assert!(!controller.state.running);
}

#[test]
fn test_fetch_city_weather_respects_limit() {
    let harness = Harness::new();
    harness.mount_defaults(200);

    let services = AppServices::new(Arc::new(harness.config())).unwrap();
    let mut progress = Vec::new();
    let results = services.block_on(fetch_city_weather(&services, Some(2), |done, total| {
        progress.push((done, total))
    }));

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.weather.is_some()));
    assert_eq!(progress.last(), Some(&(2, 2)));
}
