use std::time::{Duration, Instant};

use clima_geo::Neighborhood;
use clima_weather::metrics::rotation_index;
use clima_weather::{extremes, heat_intensity, Extremes, NeighborhoodWeather};

use crate::models::{LoadState, EMPTY_MESSAGE};

/// Degrees added around the center when there is nothing to frame
const EMPTY_SPAN: f64 = 0.1;
/// Minimum padding around the neighborhoods, in degrees
const MIN_PADDING: f64 = 0.01;

/// Geographic rectangle shown by the map canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl MapBounds {
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}

/// One cell of the heat layer, located at its center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatCell {
    pub lon: f64,
    pub lat: f64,
    /// 0..=1 between the coldest and hottest known temperature
    pub intensity: f64,
}

/// Markers, heat layer and extremes for the map page
#[derive(Debug, Default)]
pub struct MapModel {
    pub state: LoadState,
    pub progress: Option<(usize, usize)>,
    pub results: Vec<NeighborhoodWeather>,
    pub extremes: Extremes,
    last_refresh: Option<Instant>,
    request: u64,
}

impl MapModel {
    /// Start a fetch. The first one lays out placeholder markers so the map
    /// is not empty while temperatures load; refreshes keep the old values.
    pub fn begin(&mut self, neighborhoods: &[Neighborhood]) -> u64 {
        self.request += 1;
        self.state = LoadState::Loading;
        self.progress = Some((0, neighborhoods.len()));
        if self.results.is_empty() {
            self.results = neighborhoods
                .iter()
                .map(|n| NeighborhoodWeather {
                    neighborhood: n.clone(),
                    weather: None,
                })
                .collect();
        }
        self.request
    }

    pub fn apply_progress(&mut self, request: u64, done: usize, total: usize) {
        if request == self.request {
            self.progress = Some((done, total));
        }
    }

    pub fn apply_results(&mut self, request: u64, results: Vec<NeighborhoodWeather>, now: Instant) {
        if request != self.request {
            tracing::debug!("Dropping stale map batch {}", request);
            return;
        }

        self.extremes = extremes(&results);
        self.state = if results.iter().any(|r| r.weather.is_some()) {
            LoadState::Ready
        } else {
            LoadState::Failed(EMPTY_MESSAGE.to_string())
        };
        self.results = results;
        self.progress = None;
        self.last_refresh = Some(now);
    }

    pub fn last_refresh(&self) -> Option<Instant> {
        self.last_refresh
    }

    /// Whether the periodic refresh is due
    pub fn needs_refresh(&self, now: Instant, every: Duration) -> bool {
        if self.state.is_loading() {
            return false;
        }
        self.last_refresh
            .is_some_and(|last| now.saturating_duration_since(last) >= every)
    }

    /// Area framing every neighborhood, or the area around `center`
    pub fn bounds(&self, center: (f64, f64)) -> MapBounds {
        let (center_lat, center_lon) = center;
        if self.results.is_empty() {
            return MapBounds {
                west: center_lon - EMPTY_SPAN,
                east: center_lon + EMPTY_SPAN,
                south: center_lat - EMPTY_SPAN,
                north: center_lat + EMPTY_SPAN,
            };
        }

        let lats = self.results.iter().map(|r| r.neighborhood.lat);
        let lons = self.results.iter().map(|r| r.neighborhood.lon);
        let south = lats.clone().fold(f64::INFINITY, f64::min);
        let north = lats.fold(f64::NEG_INFINITY, f64::max);
        let west = lons.clone().fold(f64::INFINITY, f64::min);
        let east = lons.fold(f64::NEG_INFINITY, f64::max);

        let pad_lat = ((north - south) * 0.1).max(MIN_PADDING);
        let pad_lon = ((east - west) * 0.1).max(MIN_PADDING);

        MapBounds {
            west: west - pad_lon,
            east: east + pad_lon,
            south: south - pad_lat,
            north: north + pad_lat,
        }
    }

    /// Heat layer over a `cols` x `rows` grid covering `bounds`.
    ///
    /// Each cell takes the inverse-distance weighted temperature of the known
    /// neighborhoods; cells farther than a quarter of the map from every
    /// neighborhood are left out.
    pub fn heat_cells(&self, bounds: &MapBounds, cols: usize, rows: usize) -> Vec<HeatCell> {
        let known: Vec<(f64, f64, f64)> = self
            .results
            .iter()
            .filter_map(|r| r.temperature().map(|t| (r.neighborhood.lon, r.neighborhood.lat, t)))
            .collect();
        if known.is_empty() || cols == 0 || rows == 0 {
            return Vec::new();
        }

        let min = known.iter().map(|k| k.2).fold(f64::INFINITY, f64::min);
        let max = known.iter().map(|k| k.2).fold(f64::NEG_INFINITY, f64::max);
        let radius = bounds.width().max(bounds.height()) * 0.25;
        let cell_w = bounds.width() / cols as f64;
        let cell_h = bounds.height() / rows as f64;

        let mut cells = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                let lon = bounds.west + (col as f64 + 0.5) * cell_w;
                let lat = bounds.south + (row as f64 + 0.5) * cell_h;
                if let Some(t) = interpolate(&known, lon, lat, radius) {
                    cells.push(HeatCell {
                        lon,
                        lat,
                        intensity: heat_intensity(t, min, max),
                    });
                }
            }
        }
        cells
    }

    /// Hottest and coldest entries to show now, with their 1-based position
    /// among ties
    pub fn extremes_at(
        &self,
        elapsed_secs: u64,
        period_secs: u64,
    ) -> (
        Option<(&NeighborhoodWeather, usize, usize)>,
        Option<(&NeighborhoodWeather, usize, usize)>,
    ) {
        (
            rotate(&self.extremes.hottest, elapsed_secs, period_secs),
            rotate(&self.extremes.coldest, elapsed_secs, period_secs),
        )
    }
}

fn rotate(
    set: &[NeighborhoodWeather],
    elapsed_secs: u64,
    period_secs: u64,
) -> Option<(&NeighborhoodWeather, usize, usize)> {
    let index = rotation_index(set.len(), elapsed_secs, period_secs);
    set.get(index).map(|r| (r, index + 1, set.len()))
}

fn interpolate(known: &[(f64, f64, f64)], lon: f64, lat: f64, radius: f64) -> Option<f64> {
    let mut weight_sum = 0.0;
    let mut value_sum = 0.0;
    let mut in_range = false;

    for &(k_lon, k_lat, t) in known {
        let d2 = (k_lon - lon).powi(2) + (k_lat - lat).powi(2);
        if d2 < 1e-12 {
            return Some(t);
        }
        if d2.sqrt() <= radius {
            in_range = true;
        }
        let w = 1.0 / d2;
        weight_sum += w;
        value_sum += w * t;
    }

    in_range.then(|| value_sum / weight_sum)
}
