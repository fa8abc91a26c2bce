//! Forward geocoding: convert a place name to coordinates.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{Coordinates, GeoError};

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[allow(dead_code)]
    display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Resolve `query` to the best matching coordinates.
    /// Returns `Ok(None)` when Nominatim knows no such place.
    #[instrument(skip(self), level = "debug")]
    pub async fn search(&self, query: &str) -> Result<Option<Coordinates>, GeoError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Nominatim search returned status {}", status);
            return Err(GeoError::Status {
                service: "Nominatim",
                status: status.as_u16(),
            });
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeoError::Parse(e.to_string()))?;

        let Some(place) = places.into_iter().next() else {
            tracing::debug!("No geocoding result for {}", query);
            return Ok(None);
        };

        let lat = place
            .lat
            .parse::<f64>()
            .map_err(|e| GeoError::Parse(format!("latitude {:?}: {}", place.lat, e)))?;
        let lon = place
            .lon
            .parse::<f64>()
            .map_err(|e| GeoError::Parse(format!("longitude {:?}: {}", place.lon, e)))?;

        Ok(Some(Coordinates { lat, lon }))
    }

    /// Resolve a neighborhood name qualified by its city and country
    pub async fn search_neighborhood(
        &self,
        name: &str,
        city: &str,
        country: &str,
    ) -> Result<Option<Coordinates>, GeoError> {
        self.search(&neighborhood_query(name, city, country)).await
    }
}

fn neighborhood_query(name: &str, city: &str, country: &str) -> String {
    format!("{}, {}, {}", name, city, country)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighborhood_query_format() {
        assert_eq!(
            neighborhood_query("Ponta Negra", "Manaus", "Brasil"),
            "Ponta Negra, Manaus, Brasil"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            NominatimClient::new("https://nominatim.example.com/", "Test/1.0", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.base_url, "https://nominatim.example.com");
    }
}
