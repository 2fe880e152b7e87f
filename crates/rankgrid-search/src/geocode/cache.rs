//! Bounded least-recently-used cache for geocoder responses.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::GeocodeResult;

struct CacheEntry {
    results: Vec<GeocodeResult>,
    last_used: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    clock: u64,
}

/// Geocode responses keyed by normalized query text.
///
/// Holds at most `capacity` queries; inserting beyond that evicts the entry
/// read or written longest ago.
pub struct GeocodeCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl GeocodeCache {
    /// A zero `capacity` is raised to 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(CacheState::default()),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lowercased, trimmed, whitespace-collapsed cache key.
    #[must_use]
    pub fn normalize_key(query: &str) -> String {
        query
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub fn get(&self, query: &str) -> Option<Vec<GeocodeResult>> {
        let key = Self::normalize_key(query);
        let mut state = self.lock();
        state.clock += 1;
        let now = state.clock;
        state.entries.get_mut(&key).map(|entry| {
            entry.last_used = now;
            entry.results.clone()
        })
    }

    pub fn insert(&self, query: &str, results: Vec<GeocodeResult>) {
        let key = Self::normalize_key(query);
        let mut state = self.lock();
        state.clock += 1;
        let now = state.clock;

        if !state.entries.contains_key(&key) && state.entries.len() >= self.capacity {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                state.entries.remove(&oldest);
            }
        }

        state.entries.insert(
            key,
            CacheEntry {
                results,
                last_used: now,
            },
        );
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
