//! Page routes and their sidebar order.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Home,
    Dashboard,
    Map,
    Setting,
    Log,
    Report,
}

impl Route {
    /// Sidebar order; number keys 1..=6 index into it
    pub const ALL: [Route; 6] = [
        Route::Home,
        Route::Dashboard,
        Route::Map,
        Route::Setting,
        Route::Log,
        Route::Report,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Dashboard => "/dashboard",
            Route::Map => "/maps",
            Route::Setting => "/setting",
            Route::Log => "/log",
            Route::Report => "/report",
        }
    }

    /// Resolve a path; a trailing slash is ignored
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" if trimmed.starts_with('/') => "/",
            other => other,
        };
        Route::ALL.into_iter().find(|r| r.path() == normalized)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Dashboard => "Dashboard",
            Route::Map => "Map",
            Route::Setting => "Setting",
            Route::Log => "Log",
            Route::Report => "Report",
        }
    }

    pub fn index(&self) -> usize {
        Route::ALL.iter().position(|r| r == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Route> {
        Route::ALL.get(index).copied()
    }

    /// Whether the page needs the neighborhood list before it can load
    pub fn needs_neighborhoods(&self) -> bool {
        matches!(
            self,
            Route::Home | Route::Dashboard | Route::Map | Route::Report
        )
    }
}
