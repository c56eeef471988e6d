//! Process-wide memo for feed aggregates.
//!
//! A cached value reflects the store at the moment it was computed and is
//! served unchanged until it is invalidated or its TTL runs out. Each key has
//! its own async mutex, so concurrent first reads of a key compute it once.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKey {
    Categories,
    PopularTags { limit: usize },
}

struct Entry {
    value: Vec<String>,
    computed_at: Instant,
}

type Slot = Arc<tokio::sync::Mutex<Option<Entry>>>;

pub struct AggregateCache {
    ttl: Option<Duration>,
    slots: Mutex<HashMap<AggregateKey, Slot>>,
}

impl AggregateCache {
    /// `None` keeps values until they are invalidated explicitly.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Returns the memoized value for `key`, running `compute` on a miss.
    ///
    /// A failed computation yields an empty list and is not memoized.
    pub async fn get_or_compute<F, Fut>(&self, key: AggregateKey, compute: F) -> Vec<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>, DomainError>>,
    {
        let slot = self.slot(key);
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if self.is_fresh(cached) {
                debug!(?key, "aggregate cache hit");
                return cached.value.clone();
            }
        }

        debug!(?key, "aggregate cache miss");
        match compute().await {
            Ok(value) => {
                *entry = Some(Entry {
                    value: value.clone(),
                    computed_at: Instant::now(),
                });
                value
            }
            Err(err) => {
                warn!(?key, error = %err, "aggregate computation failed, serving empty result");
                Vec::new()
            }
        }
    }

    pub fn invalidate(&self, key: AggregateKey) {
        if self.lock_slots().remove(&key).is_some() {
            debug!(?key, "aggregate invalidated");
        }
    }

    pub fn invalidate_all(&self) {
        let mut slots = self.lock_slots();
        let dropped = slots.len();
        slots.clear();
        debug!(dropped, "aggregate cache cleared");
    }

    fn is_fresh(&self, entry: &Entry) -> bool {
        self.ttl
            .is_none_or(|ttl| entry.computed_at.elapsed() < ttl)
    }

    fn slot(&self, key: AggregateKey) -> Slot {
        Arc::clone(self.lock_slots().entry(key).or_default())
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<AggregateKey, Slot>> {
        // The map only holds handles; a panic elsewhere cannot leave it half-written.
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for AggregateCache {
    fn default() -> Self {
        Self::new(None)
    }
}
