//! Playable references: opaque locators handed to the playback side in place
//! of the source itself.
//!
//! Each reference is issued once, owned by exactly one track and released
//! when that track goes away. The registry keeps issue/release counters so
//! leaks and double releases are observable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::debug;

use crate::library::MediaSource;

const LOCATOR_PREFIX: &str = "encore://track/";

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    live: HashMap<u64, Arc<dyn MediaSource>>,
    issued: u64,
    released: u64,
}

fn lock(inner: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Default)]
pub struct RefRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl RefRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source` and hand back the reference that keeps it resolvable.
    pub fn issue(&self, source: Arc<dyn MediaSource>) -> PlayableRef {
        let mut reg = lock(&self.inner);
        let id = reg.next_id;
        reg.next_id += 1;
        reg.issued += 1;
        reg.live.insert(id, source);

        PlayableRef {
            id,
            locator: format!("{LOCATOR_PREFIX}{id}"),
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Look up the source behind a locator. Released or unknown locators
    /// resolve to `None`.
    pub fn resolve(&self, locator: &str) -> Option<Arc<dyn MediaSource>> {
        let id: u64 = locator.strip_prefix(LOCATOR_PREFIX)?.parse().ok()?;
        lock(&self.inner).live.get(&id).cloned()
    }

    /// References issued and not yet released.
    pub fn live(&self) -> usize {
        lock(&self.inner).live.len()
    }

    pub fn issued(&self) -> u64 {
        lock(&self.inner).issued
    }

    pub fn released(&self) -> u64 {
        lock(&self.inner).released
    }
}

/// A registered, resolvable handle to a track's source.
#[derive(Debug)]
pub struct PlayableRef {
    id: u64,
    locator: String,
    registry: Weak<Mutex<Registry>>,
}

impl PlayableRef {
    pub fn locator(&self) -> &str {
        &self.locator
    }
}

impl Drop for PlayableRef {
    fn drop(&mut self) {
        let Some(inner) = self.registry.upgrade() else {
            return;
        };
        let mut reg = lock(&inner);
        if reg.live.remove(&self.id).is_some() {
            reg.released += 1;
            debug!(locator = %self.locator, "released playable reference");
        }
    }
}
