//! Cache of rendered views
//!
//! The list view is rendered once and served from here until a mutation
//! invalidates its path. Every invalidation bumps a per-path generation, and
//! a view rendered under an older generation is never stored.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct Entries {
    views: HashMap<String, Value>,
    generations: HashMap<String, u64>,
}

/// Rendered views keyed by route path; clones share the same entries
#[derive(Clone, Default)]
pub struct ViewCache {
    inner: Arc<RwLock<Entries>>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Value> {
        let entries = self.inner.read().unwrap_or_else(|e| e.into_inner());
        entries.views.get(path).cloned()
    }

    /// Number of invalidations seen for `path` so far
    ///
    /// Read it before loading the data for a view and pass it to
    /// [`put_if_generation`](Self::put_if_generation).
    pub fn generation(&self, path: &str) -> u64 {
        let entries = self.inner.read().unwrap_or_else(|e| e.into_inner());
        entries.generations.get(path).copied().unwrap_or(0)
    }

    /// Store `view` only if `path` was not invalidated since `generation`
    ///
    /// Returns whether the view was stored.
    pub fn put_if_generation(&self, path: &str, generation: u64, view: Value) -> bool {
        let mut entries = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let current = entries.generations.get(path).copied().unwrap_or(0);
        if current != generation {
            tracing::debug!(path, generation, current, "Discarding stale view");
            return false;
        }
        entries.views.insert(path.to_string(), view);
        true
    }

    /// Discard the view rendered for `path`; returns whether one was cached
    pub fn invalidate(&self, path: &str) -> bool {
        let mut entries = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *entries.generations.entry(path.to_string()).or_insert(0) += 1;
        let removed = entries.views.remove(path).is_some();
        if removed {
            tracing::debug!(path, "View invalidated");
        }
        removed
    }

    pub fn contains(&self, path: &str) -> bool {
        let entries = self.inner.read().unwrap_or_else(|e| e.into_inner());
        entries.views.contains_key(path)
    }
}
