//! Summary of the last aggregate: extremes, averages and band counts.

use std::fmt::Write as _;

use clima_weather::bands::{BANDS, COLDEST_COLOR};
use clima_weather::{chart_points, summarize, ChartPoint, NeighborhoodWeather, Summary};

/// Neighborhoods falling into one temperature band
#[derive(Debug, Clone, PartialEq)]
pub struct BandCount {
    /// Inclusive lower bound; `None` for the open band below the coolest one
    pub lower: Option<f64>,
    pub color: &'static str,
    pub count: usize,
}

impl BandCount {
    pub fn label(&self) -> String {
        match self.lower {
            Some(lower) => format!("≥ {:.0} °C", lower),
            None => format!("< {:.0} °C", BANDS[BANDS.len() - 1].0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub city: String,
    /// Neighborhoods queried
    pub total: usize,
    pub summary: Option<Summary>,
    /// Hottest band first
    pub bands: Vec<BandCount>,
}

impl Report {
    pub fn build(city: &str, results: &[NeighborhoodWeather], reference: f64) -> Self {
        let points = chart_points(results, reference);
        Self {
            city: city.to_string(),
            total: results.len(),
            summary: summarize(&points),
            bands: band_counts(&points),
        }
    }

    /// Neighborhoods with a snapshot
    pub fn with_data(&self) -> usize {
        self.summary.as_ref().map_or(0, |s| s.count)
    }

    pub fn failed(&self) -> usize {
        self.total - self.with_data()
    }

    /// Plain-text rendition for the `report` command
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Weather report for {}", self.city);
        let _ = writeln!(
            out,
            "Neighborhoods: {} queried, {} with data, {} failed",
            self.total,
            self.with_data(),
            self.failed()
        );

        let Some(summary) = &self.summary else {
            let _ = writeln!(out, "{}", crate::models::EMPTY_MESSAGE);
            return out;
        };

        let _ = writeln!(out);
        let _ = writeln!(out, "Average temperature: {:.1} °C", summary.avg_temperature);
        let _ = writeln!(out, "Average humidity:    {:.0} %", summary.avg_humidity);
        let _ = writeln!(out, "Average heat index:  {:.1} °C", summary.avg_heat_index);
        let _ = writeln!(out, "Hottest: {}", names_with_temperature(&summary.hottest));
        let _ = writeln!(out, "Coldest: {}", names_with_temperature(&summary.coldest));

        let _ = writeln!(out);
        let _ = writeln!(out, "Bands:");
        for band in self.bands.iter().filter(|b| b.count > 0) {
            let _ = writeln!(out, "  {:<10} {:>3}  {}", band.label(), band.count, band.color);
        }
        out
    }
}

pub fn names_with_temperature(points: &[ChartPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{} ({:.1} °C)", p.name, p.temperature))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Count per band, hottest first, including empty bands
pub fn band_counts(points: &[ChartPoint]) -> Vec<BandCount> {
    let mut counts: Vec<BandCount> = BANDS
        .iter()
        .map(|&(lower, color)| BandCount {
            lower: Some(lower),
            color,
            count: 0,
        })
        .chain(std::iter::once(BandCount {
            lower: None,
            color: COLDEST_COLOR,
            count: 0,
        }))
        .collect();

    for point in points {
        let slot = counts
            .iter()
            .position(|b| b.lower.map_or(true, |lower| point.temperature >= lower));
        if let Some(slot) = slot {
            counts[slot].count += 1;
        }
    }
    counts
}
