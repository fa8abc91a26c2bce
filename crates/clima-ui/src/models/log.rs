use clima_core::AppError;
use clima_geo::Coordinates;
use clima_weather::WeatherSnapshot;

use crate::services::{LogError, LogLookup};

#[derive(Debug, Clone, PartialEq)]
pub enum LogStatus {
    Pending,
    Ready {
        coordinates: Coordinates,
        weather: Option<WeatherSnapshot>,
    },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub name: String,
    pub status: LogStatus,
}

/// Weather for a fixed list of neighborhood names
#[derive(Debug, Default)]
pub struct LogModel {
    pub entries: Vec<LogEntry>,
    request: u64,
}

impl LogModel {
    pub fn begin(&mut self, names: &[String]) -> u64 {
        self.request += 1;
        self.entries = names
            .iter()
            .map(|name| LogEntry {
                name: name.clone(),
                status: LogStatus::Pending,
            })
            .collect();
        self.request
    }

    pub fn apply(&mut self, request: u64, index: usize, result: Result<LogLookup, LogError>) {
        if request != self.request {
            return;
        }
        let Some(entry) = self.entries.get_mut(index) else {
            tracing::warn!("Log result for unknown entry {}", index);
            return;
        };

        entry.status = match result {
            Ok(lookup) => LogStatus::Ready {
                coordinates: lookup.coordinates,
                weather: lookup.weather,
            },
            Err(e) => LogStatus::Failed(AppError::from(e).user_message().to_string()),
        };
    }

    pub fn is_idle(&self) -> bool {
        self.request == 0
    }

    pub fn is_loading(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.status, LogStatus::Pending))
    }

    pub fn resolved(&self) -> usize {
        self.entries.len() - self.pending()
    }

    fn pending(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, LogStatus::Pending))
            .count()
    }
}
