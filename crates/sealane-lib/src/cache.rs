//! Bounded least-recently-used memo of planned routes.
//!
//! Keys round both coordinates to two decimal degrees so near-identical
//! requests share a slot. Entries are stored as `Arc<[Route]>` and swapped in
//! under the lock, so a reader always sees a complete route list or nothing.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::assemble::Route;
use crate::geo::Coordinate;
use crate::policy::RouteOptions;

/// Normalized request identity used as the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    origin: (i64, i64),
    destination: (i64, i64),
    avoid_high_risk: bool,
    weather_penalty: i64,
}

impl CacheKey {
    pub fn new(origin: &Coordinate, destination: &Coordinate, options: &RouteOptions) -> Self {
        Self {
            origin: (hundredths(origin.lon), hundredths(origin.lat)),
            destination: (hundredths(destination.lon), hundredths(destination.lat)),
            avoid_high_risk: options.avoid_high_risk,
            weather_penalty: hundredths(options.weather_penalty),
        }
    }
}

fn hundredths(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimal = |v: i64| v as f64 / 100.0;
        write!(
            f,
            "{:.2},{:.2}->{:.2},{:.2}|avoid={}|weather={:.2}",
            decimal(self.origin.0),
            decimal(self.origin.1),
            decimal(self.destination.0),
            decimal(self.destination.1),
            self.avoid_high_risk,
            decimal(self.weather_penalty)
        )
    }
}

/// Counters describing cache effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub evictions: u64,
    pub capacity: usize,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: IndexMap<CacheKey, Arc<[Route]>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Route cache owned by a single engine instance.
///
/// Entry order in the map is recency order: the front is evicted first. A
/// capacity of zero disables caching entirely.
#[derive(Debug)]
pub struct RouteCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl RouteCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Look up `key`, marking it most recently used on a hit.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<[Route]>> {
        if !self.is_enabled() {
            return None;
        }
        let mut state = self.lock();
        let position = state.entries.get_index_of(key);
        match position {
            Some(index) => {
                let last = state.entries.len() - 1;
                state.entries.move_index(index, last);
                state.hits += 1;
                debug!(key = %key, "route cache hit");
                state.entries.get(key).cloned()
            }
            None => {
                state.misses += 1;
                debug!(key = %key, "route cache miss");
                None
            }
        }
    }

    /// Store `routes` under `key`, evicting the least recently used entries
    /// beyond capacity. Returns the shared list that was stored.
    pub fn put(&self, key: CacheKey, routes: Vec<Route>) -> Arc<[Route]> {
        let routes: Arc<[Route]> = routes.into();
        if !self.is_enabled() {
            return routes;
        }

        let mut state = self.lock();
        state.entries.shift_remove(&key);
        state.entries.insert(key, Arc::clone(&routes));
        while state.entries.len() > self.capacity {
            if let Some((evicted, _)) = state.entries.shift_remove_index(0) {
                state.evictions += 1;
                debug!(key = %evicted, "evicted route cache entry");
            }
        }
        routes
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            entries: state.entries.len(),
            evictions: state.evictions,
            capacity: self.capacity,
        }
    }

    // A panic while holding the lock cannot leave a half-written entry, so the
    // poisoned state is still consistent.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
