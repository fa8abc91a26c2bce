//! Derived metrics for the chart and report pages.

use serde::Serialize;

use crate::types::NeighborhoodWeather;

/// Reference temperature (°C) the Dashboard measures variation against
pub const DEFAULT_REFERENCE_TEMPERATURE: f64 = 27.0;

/// Simplified heat index from temperature (°C) and relative humidity (%)
pub fn heat_index(temperature: f64, humidity: f64) -> f64 {
    temperature + 0.5555 * (humidity / 100.0 - 0.1) * (temperature - 14.5)
}

/// Absolute distance from the reference temperature
pub fn variation(temperature: f64, reference: f64) -> f64 {
    (temperature - reference).abs()
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One neighborhood on the composed chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub temperature: f64,
    pub humidity: f64,
    pub heat_index: f64,
    pub variation: f64,
}

/// Chart points for successful lookups, coolest first
pub fn chart_points(results: &[NeighborhoodWeather], reference: f64) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = results
        .iter()
        .filter_map(|result| {
            let weather = result.weather.as_ref()?;
            Some(ChartPoint {
                name: result.neighborhood.name.clone(),
                temperature: weather.temperature,
                humidity: weather.humidity,
                heat_index: round1(heat_index(weather.temperature, weather.humidity)),
                variation: round1(variation(weather.temperature, reference)),
            })
        })
        .collect();

    points.sort_by(|a, b| a.temperature.total_cmp(&b.temperature));
    points
}

/// Aggregates shown in the Dashboard cards and the Report page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub avg_temperature: f64,
    pub avg_humidity: f64,
    pub avg_heat_index: f64,
    /// Every point sharing the maximum temperature
    pub hottest: Vec<ChartPoint>,
    /// Every point sharing the minimum temperature
    pub coldest: Vec<ChartPoint>,
}

/// `None` when there are no points
pub fn summarize(points: &[ChartPoint]) -> Option<Summary> {
    if points.is_empty() {
        return None;
    }

    let count = points.len();
    let n = count as f64;
    let avg = |f: fn(&ChartPoint) -> f64| points.iter().map(f).sum::<f64>() / n;

    let max = points.iter().map(|p| p.temperature).fold(f64::NEG_INFINITY, f64::max);
    let min = points.iter().map(|p| p.temperature).fold(f64::INFINITY, f64::min);

    Some(Summary {
        count,
        avg_temperature: avg(|p| p.temperature),
        avg_humidity: avg(|p| p.humidity),
        avg_heat_index: avg(|p| p.heat_index),
        hottest: points.iter().filter(|p| p.temperature == max).cloned().collect(),
        coldest: points.iter().filter(|p| p.temperature == min).cloned().collect(),
    })
}

/// Hottest and coldest neighborhoods, ties preserved in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extremes {
    pub hottest: Vec<NeighborhoodWeather>,
    pub coldest: Vec<NeighborhoodWeather>,
}

impl Extremes {
    pub fn is_empty(&self) -> bool {
        self.hottest.is_empty() && self.coldest.is_empty()
    }
}

pub fn extremes(results: &[NeighborhoodWeather]) -> Extremes {
    let temps: Vec<(usize, f64)> = results
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.temperature().filter(|t| !t.is_nan()).map(|t| (i, t)))
        .collect();

    if temps.is_empty() {
        return Extremes::default();
    }

    let max = temps.iter().map(|(_, t)| *t).fold(f64::NEG_INFINITY, f64::max);
    let min = temps.iter().map(|(_, t)| *t).fold(f64::INFINITY, f64::min);

    let pick = |target: f64| {
        temps
            .iter()
            .filter(|(_, t)| *t == target)
            .map(|(i, _)| results[*i].clone())
            .collect()
    };

    Extremes {
        hottest: pick(max),
        coldest: pick(min),
    }
}

/// Index into a tied set that advances every `period_secs`
pub fn rotation_index(len: usize, elapsed_secs: u64, period_secs: u64) -> usize {
    if len == 0 {
        return 0;
    }
    let period = period_secs.max(1);
    ((elapsed_secs / period) % len as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{WeatherCondition, WeatherSnapshot};
    use chrono::Utc;
    use clima_geo::Neighborhood;

    fn result(name: &str, weather: Option<(f64, f64)>) -> NeighborhoodWeather {
        NeighborhoodWeather {
            neighborhood: Neighborhood::new(name, -3.1, -60.0),
            weather: weather.map(|(temperature, humidity)| WeatherSnapshot {
                temperature,
                feels_like: heat_index(temperature, humidity),
                humidity,
                wind_speed: 2.0,
                pressure: 1010.0,
                precipitation: 0.0,
                symbol_code: "cloudy".into(),
                condition: WeatherCondition::Cloudy,
                updated_at: None,
                fetched_at: Utc::now(),
            }),
        }
    }

    #[test]
    fn test_heat_index_formula() {
        // 30 + 0.5555 * (0.8 - 0.1) * 15.5
        assert!((heat_index(30.0, 80.0) - 36.027_175).abs() < 1e-6);
        // At 14.5 °C humidity has no effect
        assert_eq!(heat_index(14.5, 95.0), 14.5);
    }

    #[test]
    fn test_variation_is_absolute() {
        assert_eq!(variation(25.0, 27.0), 2.0);
        assert_eq!(variation(29.5, 27.0), 2.5);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(36.027), 36.0);
        assert_eq!(round1(36.05001), 36.1);
        assert_eq!(round1(-1.26), -1.3);
    }

    #[test]
    fn test_chart_points_drop_failures_and_sort() {
        let points = chart_points(
            &[
                result("Centro", Some((31.0, 60.0))),
                result("Aleixo", None),
                result("Compensa", Some((28.5, 75.0))),
            ],
            27.0,
        );

        let names: Vec<_> = points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Compensa", "Centro"]);
        assert_eq!(points[1].variation, 4.0);
        assert_eq!(points[1].heat_index, round1(heat_index(31.0, 60.0)));
    }

    #[test]
    fn test_summarize_averages_and_ties() {
        let points = chart_points(
            &[
                result("A", Some((30.0, 70.0))),
                result("B", Some((26.0, 90.0))),
                result("C", Some((30.0, 50.0))),
            ],
            27.0,
        );
        let summary = summarize(&points).unwrap();

        assert_eq!(summary.count, 3);
        assert!((summary.avg_temperature - 28.666_666).abs() < 1e-5);
        assert!((summary.avg_humidity - 70.0).abs() < 1e-9);
        assert_eq!(summary.hottest.len(), 2);
        assert_eq!(summary.coldest.len(), 1);
        assert_eq!(summary.coldest[0].name, "B");
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_extremes_with_ties() {
        let found = extremes(&[
            result("A", Some((29.0, 70.0))),
            result("B", Some((33.0, 60.0))),
            result("C", None),
            result("D", Some((33.0, 55.0))),
            result("E", Some((25.5, 90.0))),
        ]);

        let hot: Vec<_> = found.hottest.iter().map(|r| r.neighborhood.name.as_str()).collect();
        assert_eq!(hot, vec!["B", "D"]);
        assert_eq!(found.coldest.len(), 1);
        assert_eq!(found.coldest[0].neighborhood.name, "E");
    }

    #[test]
    fn test_extremes_without_data() {
        assert!(extremes(&[result("A", None)]).is_empty());
    }

    #[test]
    fn test_rotation_index() {
        assert_eq!(rotation_index(0, 100, 7), 0);
        assert_eq!(rotation_index(1, 100, 7), 0);
        assert_eq!(rotation_index(3, 0, 7), 0);
        assert_eq!(rotation_index(3, 7, 7), 1);
        assert_eq!(rotation_index(3, 21, 7), 0);
        assert_eq!(rotation_index(2, 5, 0), 1);
    }
}
