//! Per-page state. Models are plain data updated from service messages on
//! the UI thread; views only read them.

pub mod dashboard;
pub mod home;
pub mod log;
pub mod map;
pub mod report;
pub mod setting;

pub use dashboard::DashboardModel;
pub use home::HomeModel;
pub use log::{LogEntry, LogModel, LogStatus};
pub use map::{HeatCell, MapBounds, MapModel};
pub use report::{BandCount, Report};

/// Shown when a page's lookup produced nothing usable
pub const EMPTY_MESSAGE: &str = "No data available. Try again.";

/// Lifecycle of a page's data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl LoadState {
    pub fn is_idle(&self) -> bool {
        matches!(self, LoadState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// `"<done> of <total> neighborhoods (<pct>%)"`
pub fn progress_label(done: usize, total: usize) -> String {
    format!("{} of {} neighborhoods ({}%)", done, total, progress_percent(done, total))
}

pub fn progress_percent(done: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    ((done.min(total) as f64 / total as f64) * 100.0).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_label() {
        assert_eq!(progress_label(5, 63), "5 of 63 neighborhoods (8%)");
        assert_eq!(progress_label(63, 63), "63 of 63 neighborhoods (100%)");
        assert_eq!(progress_label(0, 0), "0 of 0 neighborhoods (0%)");
    }

    #[test]
    fn test_load_state_error() {
        assert_eq!(LoadState::Failed("x".into()).error(), Some("x"));
        assert!(LoadState::Ready.error().is_none());
        assert!(LoadState::default().is_idle());
    }
}
