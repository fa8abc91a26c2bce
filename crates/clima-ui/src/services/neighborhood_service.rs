//! Neighborhood backend: discovers the city's neighborhoods once per refresh.
//! Network work runs on the services runtime; results sent via mpsc.

use std::sync::mpsc::Sender;

use clima_core::CityConfig;
use clima_geo::{neighborhoods_or_fallback, NeighborhoodList, OverpassClient};

use crate::app_services::{fallback_neighborhoods, AppServices};

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum NeighborhoodServiceMessage {
    /// Discovered neighborhoods, or the configured fallback list
    Loaded(NeighborhoodList),
}

/// Neighborhoods for the configured city; never fails, falls back instead
pub async fn load_neighborhoods(overpass: &OverpassClient, city: &CityConfig) -> NeighborhoodList {
    let fallback = fallback_neighborhoods(city);
    let found = neighborhoods_or_fallback(overpass, &city.name, &fallback).await;
    tracing::info!(
        "{} neighborhoods available for {}{}",
        found.neighborhoods.len(),
        city.name,
        if found.is_fallback { " (fallback)" } else { "" }
    );
    found
}

/// Request the neighborhood list asynchronously.
/// Sends `Loaded` on the channel when complete.
pub fn request_load(tx: &Sender<NeighborhoodServiceMessage>, services: &AppServices) {
    let tx = tx.clone();
    let overpass = services.overpass();
    let city = services.config().city.clone();
    let token = services.shutdown_token();

    services.runtime().spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("Neighborhood request cancelled");
            }
            found = load_neighborhoods(&overpass, &city) => {
                let _ = tx.send(NeighborhoodServiceMessage::Loaded(found));
            }
        }
    });
}
