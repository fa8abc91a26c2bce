use clima_geo::Neighborhood;
use clima_weather::metrics::{rotation_index, DEFAULT_REFERENCE_TEMPERATURE};
use clima_weather::{chart_points, summarize, ChartPoint, NeighborhoodWeather, Summary};

use crate::models::{progress_label, LoadState, EMPTY_MESSAGE};

/// Aggregate chart over the city's neighborhoods
#[derive(Debug)]
pub struct DashboardModel {
    pub state: LoadState,
    /// `(done, total)` while a batch is running
    pub progress: Option<(usize, usize)>,
    pub results: Vec<NeighborhoodWeather>,
    /// Successful lookups, coolest first
    pub points: Vec<ChartPoint>,
    pub summary: Option<Summary>,
    reference: f64,
    request: u64,
}

impl Default for DashboardModel {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_TEMPERATURE)
    }
}

impl DashboardModel {
    pub fn new(reference: f64) -> Self {
        Self {
            state: LoadState::Idle,
            progress: None,
            results: Vec::new(),
            points: Vec::new(),
            summary: None,
            reference,
            request: 0,
        }
    }

    pub fn reference(&self) -> f64 {
        self.reference
    }

    /// The neighborhoods the dashboard considers
    pub fn targets(neighborhoods: &[Neighborhood], limit: usize) -> Vec<Neighborhood> {
        neighborhoods.iter().take(limit).cloned().collect()
    }

    pub fn begin(&mut self, total: usize) -> u64 {
        self.request += 1;
        self.state = LoadState::Loading;
        self.progress = Some((0, total));
        self.request
    }

    pub fn apply_progress(&mut self, request: u64, done: usize, total: usize) {
        if request == self.request && self.state.is_loading() {
            self.progress = Some((done, total));
        }
    }

    pub fn apply_results(&mut self, request: u64, results: Vec<NeighborhoodWeather>) {
        if request != self.request {
            tracing::debug!("Dropping stale dashboard batch {}", request);
            return;
        }

        self.points = chart_points(&results, self.reference);
        self.summary = summarize(&self.points);
        self.results = results;
        self.progress = None;
        self.state = if self.points.is_empty() {
            LoadState::Failed(EMPTY_MESSAGE.to_string())
        } else {
            LoadState::Ready
        };

        tracing::info!(
            "Dashboard ready: {} of {} neighborhoods with data",
            self.points.len(),
            self.results.len()
        );
    }

    pub fn progress_label(&self) -> Option<String> {
        self.progress.map(|(done, total)| progress_label(done, total))
    }

    /// Gauge ratio, always within 0..=1
    pub fn progress_ratio(&self) -> f64 {
        match self.progress {
            Some((_, 0)) | None => 0.0,
            Some((done, total)) => (done as f64 / total as f64).clamp(0.0, 1.0),
        }
    }

    /// The hottest neighborhood to show now, with its 1-based position among ties
    pub fn hottest_at(&self, elapsed_secs: u64, period_secs: u64) -> Option<(&ChartPoint, usize, usize)> {
        let hottest = &self.summary.as_ref()?.hottest;
        let index = rotation_index(hottest.len(), elapsed_secs, period_secs);
        hottest.get(index).map(|p| (p, index + 1, hottest.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use clima_weather::{heat_index, WeatherCondition, WeatherSnapshot};

    fn result(name: &str, temperature: Option<f64>) -> NeighborhoodWeather {
        NeighborhoodWeather {
            neighborhood: Neighborhood::new(name, -3.1, -60.0),
            weather: temperature.map(|t| WeatherSnapshot {
                temperature: t,
                feels_like: heat_index(t, 70.0),
                humidity: 70.0,
                wind_speed: 1.0,
                pressure: 1010.0,
                precipitation: 0.0,
                symbol_code: "clearsky_day".into(),
                condition: WeatherCondition::Clear,
                updated_at: None,
                fetched_at: Utc::now(),
            }),
        }
    }

    #[test]
    fn test_targets_respect_limit() {
        let all: Vec<_> = (0..70)
            .map(|i| Neighborhood::new(format!("N{}", i), -3.1, -60.0))
            .collect();
        assert_eq!(DashboardModel::targets(&all, 63).len(), 63);
        assert_eq!(DashboardModel::targets(&all[..2], 63).len(), 2);
    }

    #[test]
    fn test_progress_flow() {
        let mut model = DashboardModel::default();
        let request = model.begin(10);
        assert_eq!(model.progress_label().as_deref(), Some("0 of 10 neighborhoods (0%)"));

        model.apply_progress(request, 5, 10);
        assert_eq!(model.progress_ratio(), 0.5);
        assert_eq!(model.progress_label().as_deref(), Some("5 of 10 neighborhoods (50%)"));

        model.apply_progress(request + 1, 10, 10);
        assert_eq!(model.progress, Some((5, 10)));
    }

    #[test]
    fn test_results_build_chart_and_summary() {
        let mut model = DashboardModel::new(27.0);
        let request = model.begin(3);
        model.apply_results(
            request,
            vec![result("Centro", Some(31.0)), result("Aleixo", None), result("Flores", Some(28.0))],
        );

        assert_eq!(model.state, LoadState::Ready);
        assert!(model.progress.is_none());
        assert_eq!(model.results.len(), 3);
        let names: Vec<_> = model.points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Flores", "Centro"]);
        assert_eq!(model.summary.as_ref().map(|s| s.count), Some(2));
    }

    #[test]
    fn test_all_failed_is_empty_state() {
        let mut model = DashboardModel::default();
        let request = model.begin(2);
        model.apply_results(request, vec![result("A", None), result("B", None)]);
        assert_eq!(model.state.error(), Some(EMPTY_MESSAGE));
        assert!(model.summary.is_none());
    }

    #[test]
    fn test_hottest_rotates_through_ties() {
        let mut model = DashboardModel::default();
        let request = model.begin(3);
        model.apply_results(
            request,
            vec![result("A", Some(33.0)), result("B", Some(30.0)), result("C", Some(33.0))],
        );

        let (first, i, n) = model.hottest_at(0, 10).unwrap();
        assert_eq!((first.name.as_str(), i, n), ("A", 1, 2));
        let (second, i, _) = model.hottest_at(10, 10).unwrap();
        assert_eq!((second.name.as_str(), i), ("C", 2));
        let (again, _, _) = model.hottest_at(25, 10).unwrap();
        assert_eq!(again.name, "A");
    }
}
