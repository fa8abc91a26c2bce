use clima_core::Config;

/// Effective configuration as labelled rows, grouped by section
pub fn setting_rows(config: &Config) -> Vec<(&'static str, Vec<(&'static str, String)>)> {
    let city = &config.city;
    let services = &config.services;
    let weather = &config.weather;
    let ui = &config.ui;

    vec![
        (
            "City",
            vec![
                ("Name", city.name.clone()),
                ("Country", city.country.clone()),
                ("Center", format!("{:.4}, {:.4}", city.center_lat, city.center_lon)),
                ("Zoom", city.zoom.to_string()),
                ("Neighborhood limit", city.neighborhood_limit.to_string()),
                (
                    "Fallback",
                    city.fallback_neighborhoods
                        .iter()
                        .map(|n| n.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
            ],
        ),
        (
            "Services",
            vec![
                ("Overpass", services.overpass_url.clone()),
                ("Forecast", services.forecast_url.clone()),
                ("Nominatim", services.nominatim_url.clone()),
                ("User-Agent", services.user_agent.clone()),
                ("Timeout", format!("{} s", services.request_timeout_secs)),
            ],
        ),
        (
            "Weather",
            vec![
                ("Cache TTL", format!("{} min", weather.cache_ttl_minutes)),
                (
                    "Retry",
                    format!(
                        "{} attempts, {} ms step",
                        weather.max_attempts, weather.backoff_step_ms
                    ),
                ),
                (
                    "Batch",
                    format!(
                        "{} per chunk, {} ms pause, <{} ms jitter",
                        weather.batch_size, weather.batch_pause_ms, weather.max_jitter_ms
                    ),
                ),
                ("Map refresh", format!("{} min", weather.refresh_minutes)),
                ("Reference", format!("{:.1} °C", weather.reference_temperature)),
            ],
        ),
        (
            "Interface",
            vec![
                ("Tick", format!("{} ms", ui.tick_rate_ms)),
                ("Extremes rotation", format!("{} s", ui.extremes_rotate_secs)),
                ("Hottest rotation", format!("{} s", ui.hottest_rotate_secs)),
                ("Log entries", config.log.neighborhoods.len().to_string()),
                ("Config dir", config.config_dir.display().to_string()),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_reflect_config() {
        let mut config = Config::default();
        config.weather.cache_ttl_minutes = 15;
        let rows = setting_rows(&config);

        let sections: Vec<_> = rows.iter().map(|(s, _)| *s).collect();
        assert_eq!(sections, vec!["City", "Services", "Weather", "Interface"]);

        let weather = &rows[2].1;
        assert!(weather.contains(&("Cache TTL", "15 min".to_string())));
        assert!(rows[0].1.contains(&("Fallback", "Centro, Adrianópolis, Aleixo".to_string())));
    }
}
