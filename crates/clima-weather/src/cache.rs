//! In-memory weather cache with a fixed time-to-live.
//!
//! Coordinates are rounded to two decimals (roughly 1 km) before keying, so
//! nearby neighborhoods reuse one snapshot. Expired entries are dropped on
//! read; there is no size bound.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::types::WeatherSnapshot;

pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Cache key shared by all coordinates within the same 0.01° cell
pub fn cache_key(lat: f64, lon: f64) -> String {
    format!("{:.2},{:.2}", lat, lon)
}

#[derive(Debug, Clone)]
struct CacheEntry {
    snapshot: WeatherSnapshot,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct WeatherCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl WeatherCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh snapshot for `key`, if any
    pub fn get(&self, key: &str) -> Option<WeatherSnapshot> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<WeatherSnapshot> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if now.saturating_duration_since(entry.stored_at) < self.ttl => {
                Some(entry.snapshot.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: String, snapshot: WeatherSnapshot) {
        self.insert_at(key, snapshot, Instant::now());
    }

    fn insert_at(&self, key: String, snapshot: WeatherSnapshot, stored_at: Instant) {
        self.entries.lock().insert(key, CacheEntry { snapshot, stored_at });
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    fn purge_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.stored_at) < self.ttl);
        before - entries.len()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        let count = entries.len();
        entries.clear();
        tracing::info!("Weather cache cleared ({} entries)", count);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeatherCondition;
    use chrono::Utc;

    fn snapshot(temperature: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature,
            feels_like: temperature,
            humidity: 80.0,
            wind_speed: 1.5,
            pressure: 1010.0,
            precipitation: 0.0,
            symbol_code: "cloudy".to_string(),
            condition: WeatherCondition::Cloudy,
            updated_at: None,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_cache_key_rounds_to_two_decimals() {
        assert_eq!(cache_key(-3.1190, -60.0217), "-3.12,-60.02");
        assert_eq!(cache_key(-3.1249, -60.0249), cache_key(-3.1151, -60.0151));
        assert_ne!(cache_key(-3.11, -60.02), cache_key(-3.12, -60.02));
    }

    #[test]
    fn test_get_returns_fresh_entry() {
        let cache = WeatherCache::new(Duration::from_secs(600));
        cache.insert("k".into(), snapshot(28.0));
        assert_eq!(cache.get("k").map(|s| s.temperature), Some(28.0));
    }

    #[test]
    fn test_expired_entry_is_removed_on_read() {
        let cache = WeatherCache::new(Duration::from_secs(600));
        let stored_at = Instant::now();
        cache.insert_at("k".into(), snapshot(28.0), stored_at);

        let later = stored_at + Duration::from_secs(601);
        assert!(cache.get_at("k", later).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_entry_valid_until_ttl() {
        let cache = WeatherCache::new(Duration::from_secs(600));
        let stored_at = Instant::now();
        cache.insert_at("k".into(), snapshot(28.0), stored_at);

        let almost = stored_at + Duration::from_secs(599);
        assert!(cache.get_at("k", almost).is_some());
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let cache = WeatherCache::new(Duration::ZERO);
        cache.insert("k".into(), snapshot(28.0));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_clear() {
        let cache = WeatherCache::default();
        cache.insert("a".into(), snapshot(27.0));
        cache.insert("b".into(), snapshot(29.0));
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired_keeps_fresh_entries() {
        let cache = WeatherCache::new(Duration::from_secs(600));
        let start = Instant::now();
        cache.insert_at("old".into(), snapshot(27.0), start);
        cache.insert_at("new".into(), snapshot(29.0), start + Duration::from_secs(650));

        let now = start + Duration::from_secs(700);
        assert_eq!(cache.purge_expired_at(now), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get_at("new", now).is_some());
    }

    #[test]
    fn test_purge_expired_on_fresh_cache_removes_nothing() {
        let cache = WeatherCache::new(Duration::from_secs(600));
        cache.insert("a".into(), snapshot(27.0));
        assert_eq!(cache.purge_expired(), 0);
        assert_eq!(cache.len(), 1);
    }
}
