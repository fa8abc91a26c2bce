use crate::services::LogError;
use clima_core::{AppError, GeoError};

impl From<LogError> for AppError {
    fn from(e: LogError) -> Self {
        match e {
            LogError::NotFound(s) => AppError::Geo(GeoError::PlaceNotFound(s)),
            LogError::Geocode(s) => AppError::Geo(GeoError::ApiError(s)),
        }
    }
}
