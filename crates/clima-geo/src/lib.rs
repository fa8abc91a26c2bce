//! Places lookup for Clima
//!
//! Discovers a city's named neighborhoods through the Overpass API and
//! resolves free-text place names through Nominatim (OpenStreetMap).

pub mod nominatim;
pub mod overpass;
pub mod types;

pub use nominatim::NominatimClient;
pub use overpass::{neighborhoods_or_fallback, OverpassClient};
pub use types::*;
