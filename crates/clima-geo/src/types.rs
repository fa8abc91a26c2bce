use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A named sub-area of the city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Neighborhood {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }
}

/// Neighborhoods for a city and whether they are the configured fallback
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodList {
    pub neighborhoods: Vec<Neighborhood>,
    /// The service failed or found nothing, so the fallback list was used
    pub is_fallback: bool,
}

/// Places service errors
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{service} returned status {status}")]
    Status { service: &'static str, status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("No match for {0}")]
    NotFound(String),
}
