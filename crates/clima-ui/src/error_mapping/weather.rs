use crate::services::WeatherServiceError;
use clima_core::{AppError, WeatherError};

impl From<WeatherServiceError> for AppError {
    fn from(e: WeatherServiceError) -> Self {
        match e {
            WeatherServiceError::Network(n) => AppError::Network(n),
            WeatherServiceError::Api(s) => AppError::Weather(WeatherError::ApiError(s)),
            WeatherServiceError::RateLimited => AppError::Weather(WeatherError::RateLimited),
            WeatherServiceError::NoData => AppError::Weather(WeatherError::NoData),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clima_core::NetworkError;

    #[test]
    fn rate_limit_message() {
        let err = AppError::from(WeatherServiceError::RateLimited);
        assert_eq!(err.user_message(), "Too many requests. Try again in a few minutes.");
    }

    #[test]
    fn timeout_message() {
        let err = AppError::from(WeatherServiceError::Network(NetworkError::Timeout));
        assert_eq!(err.user_message(), "The request timed out. Please try again.");
    }
}
