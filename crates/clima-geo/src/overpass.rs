//! Neighborhood discovery through the Overpass API.
//!
//! One query returns every `place=neighbourhood` and `place=suburb` node
//! inside the city's administrative area.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{GeoError, Neighborhood, NeighborhoodList};

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverpassElement {
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    /// Present for ways/relations when queried with `out center`
    #[serde(default)]
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

/// Client for an Overpass interpreter endpoint
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: Client,
    base_url: String,
}

impl OverpassClient {
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
            base_url: base_url.into(),
        })
    }

    /// Overpass QL selecting the named places of `city`
    pub fn build_query(city: &str) -> String {
        let city = city.replace('\\', "\\\\").replace('"', "\\\"");
        format!(
            r#"[out:json];
area["name"="{city}"]->.a;
(
  node["place"="neighbourhood"](area.a);
  node["place"="suburb"](area.a);
);
out center;"#
        )
    }

    /// Fetch the city's neighborhoods, sorted by name
    #[instrument(skip(self), level = "info")]
    pub async fn neighborhoods(&self, city: &str) -> Result<Vec<Neighborhood>, GeoError> {
        let query = Self::build_query(city);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("data", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Overpass returned status {}", status);
            return Err(GeoError::Status {
                service: "Overpass",
                status: status.as_u16(),
            });
        }

        let body: OverpassResponse = response
            .json()
            .await
            .map_err(|e| GeoError::Parse(e.to_string()))?;

        let neighborhoods = parse_elements(body.elements);
        tracing::info!("Found {} neighborhoods in {}", neighborhoods.len(), city);
        Ok(neighborhoods)
    }
}

/// Keep named elements with a position, sorted by name and deduplicated.
pub(crate) fn parse_elements(elements: Vec<OverpassElement>) -> Vec<Neighborhood> {
    let mut neighborhoods: Vec<Neighborhood> = elements
        .into_iter()
        .filter_map(|mut el| {
            let name = el.tags.remove("name")?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }

            let (lat, lon) = match (el.lat, el.lon, el.center) {
                (Some(lat), Some(lon), _) => (lat, lon),
                (_, _, Some(center)) => (center.lat, center.lon),
                _ => return None,
            };

            Some(Neighborhood::new(name, lat, lon))
        })
        .collect();

    neighborhoods.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.lat.total_cmp(&b.lat))
            .then_with(|| a.lon.total_cmp(&b.lon))
    });
    neighborhoods.dedup();

    neighborhoods
}

/// Fetch neighborhoods, falling back to `fallback` when the service fails.
pub async fn neighborhoods_or_fallback(
    client: &OverpassClient,
    city: &str,
    fallback: &[Neighborhood],
) -> NeighborhoodList {
    match client.neighborhoods(city).await {
        Ok(found) if !found.is_empty() => {
            return NeighborhoodList {
                neighborhoods: found,
                is_fallback: false,
            };
        }
        Ok(_) => tracing::warn!("No neighborhoods found for {}, using fallback list", city),
        Err(e) => tracing::warn!("Failed to fetch neighborhoods: {}, using fallback list", e),
    }
    NeighborhoodList {
        neighborhoods: fallback.to_vec(),
        is_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: Option<&str>, lat: Option<f64>, lon: Option<f64>) -> OverpassElement {
        let mut tags = HashMap::new();
        if let Some(name) = name {
            tags.insert("name".to_string(), name.to_string());
        }
        OverpassElement {
            lat,
            lon,
            center: None,
            tags,
        }
    }

    #[test]
    fn test_query_targets_city_area() {
        let query = OverpassClient::build_query("Manaus");
        assert!(query.starts_with("[out:json];"));
        assert!(query.contains(r#"area["name"="Manaus"]->.a;"#));
        assert!(query.contains(r#"node["place"="neighbourhood"](area.a);"#));
        assert!(query.contains(r#"node["place"="suburb"](area.a);"#));
        assert!(query.ends_with("out center;"));
    }

    #[test]
    fn test_query_escapes_quotes() {
        let query = OverpassClient::build_query(r#"Foo"Bar"#);
        assert!(query.contains(r#"area["name"="Foo\"Bar"]"#));
    }

    #[test]
    fn test_unnamed_elements_are_dropped() {
        let parsed = parse_elements(vec![
            element(None, Some(-3.1), Some(-60.0)),
            element(Some("  "), Some(-3.1), Some(-60.0)),
            element(Some("Centro"), Some(-3.13), Some(-60.02)),
        ]);
        assert_eq!(parsed, vec![Neighborhood::new("Centro", -3.13, -60.02)]);
    }

    #[test]
    fn test_elements_without_position_are_dropped() {
        let parsed = parse_elements(vec![element(Some("Centro"), None, Some(-60.02))]);
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_center_used_when_node_position_missing() {
        let mut el = element(Some("Flores"), None, None);
        el.center = Some(OverpassCenter {
            lat: -3.07,
            lon: -60.01,
        });
        let parsed = parse_elements(vec![el]);
        assert_eq!(parsed, vec![Neighborhood::new("Flores", -3.07, -60.01)]);
    }

    #[test]
    fn test_sorted_case_insensitively() {
        let parsed = parse_elements(vec![
            element(Some("compensa"), Some(-3.1), Some(-60.05)),
            element(Some("Aleixo"), Some(-3.09), Some(-59.99)),
            element(Some("Betânia"), Some(-3.13), Some(-60.0)),
        ]);
        let names: Vec<_> = parsed.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Aleixo", "Betânia", "compensa"]);
    }

    #[test]
    fn test_exact_duplicates_removed() {
        let parsed = parse_elements(vec![
            element(Some("Centro"), Some(-3.13), Some(-60.02)),
            element(Some("Aleixo"), Some(-3.09), Some(-59.99)),
            element(Some("Centro"), Some(-3.13), Some(-60.02)),
        ]);
        assert_eq!(parsed.len(), 2);
    }
}
