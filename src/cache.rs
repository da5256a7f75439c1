//! In-memory, time-limited cache of provider results.
//!
//! Entries are keyed by endpoint and lower-cased city name. An entry is
//! servable while `now - fetched_at < CACHE_TTL`; stale entries stay in place
//! until the next successful fetch overwrites them. Nothing is evicted.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::weather::{Forecast, WeatherSnapshot};

/// Seconds a cached result stays fresh.
pub const CACHE_TTL_SECS: i64 = 600;

pub fn cache_ttl() -> Duration {
    Duration::seconds(CACHE_TTL_SECS)
}

/// Source of "now" for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Provider endpoint a cache namespace belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Current,
    Forecast,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Current => f.write_str("current weather"),
            Endpoint::Forecast => f.write_str("forecast"),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    fetched_at: DateTime<Utc>,
    value: V,
}

#[derive(Debug)]
struct Namespace<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> Namespace<V> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn get(&self, city: &str, now: DateTime<Utc>) -> Option<V> {
        let entries = self.entries.lock();
        entries
            .get(&cache_key(city))
            .filter(|entry| now.signed_duration_since(entry.fetched_at) < cache_ttl())
            .map(|entry| entry.value.clone())
    }

    fn put(&self, city: &str, value: V, now: DateTime<Utc>) {
        self.entries.lock().insert(
            cache_key(city),
            CacheEntry {
                fetched_at: now,
                value,
            },
        );
    }

    fn fetched_at(&self, city: &str) -> Option<DateTime<Utc>> {
        self.entries
            .lock()
            .get(&cache_key(city))
            .map(|entry| entry.fetched_at)
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

fn cache_key(city: &str) -> String {
    city.to_lowercase()
}

/// Two disjoint namespaces, one per endpoint, sharing a clock.
///
/// Each read or write takes the namespace lock briefly; the lock is never
/// held across a network call, so concurrent misses for the same city may
/// both fetch and the later write wins.
pub struct WeatherCache {
    clock: Arc<dyn Clock>,
    current: Namespace<WeatherSnapshot>,
    forecast: Namespace<Forecast>,
}

impl WeatherCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            current: Namespace::new(),
            forecast: Namespace::new(),
        }
    }

    pub fn current(&self, city: &str) -> Option<WeatherSnapshot> {
        self.current.get(city, self.clock.now())
    }

    pub fn store_current(&self, city: &str, snapshot: WeatherSnapshot) {
        self.current.put(city, snapshot, self.clock.now());
    }

    pub fn forecast(&self, city: &str) -> Option<Forecast> {
        self.forecast.get(city, self.clock.now())
    }

    pub fn store_forecast(&self, city: &str, forecast: Forecast) {
        self.forecast.put(city, forecast, self.clock.now());
    }

    /// When the entry for `city` was last written, fresh or stale.
    pub fn fetched_at(&self, endpoint: Endpoint, city: &str) -> Option<DateTime<Utc>> {
        match endpoint {
            Endpoint::Current => self.current.fetched_at(city),
            Endpoint::Forecast => self.forecast.fetched_at(city),
        }
    }

    /// Number of entries in a namespace, stale ones included.
    pub fn len(&self, endpoint: Endpoint) -> usize {
        match endpoint {
            Endpoint::Current => self.current.len(),
            Endpoint::Forecast => self.forecast.len(),
        }
    }
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl fmt::Debug for WeatherCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherCache")
            .field("current", &self.current.len())
            .field("forecast", &self.forecast.len())
            .finish()
    }
}
