pub mod log_service;
pub mod neighborhood_service;
pub mod weather_service;

pub use log_service::{request_lookups, LogError, LogLookup, LogServiceMessage};
pub use neighborhood_service::{
    load_neighborhoods, request_load as request_neighborhoods, NeighborhoodServiceMessage,
};
pub use weather_service::{
    fetch_city_weather, request_batch, request_current, BatchTarget, WeatherServiceError,
    WeatherServiceMessage,
};
