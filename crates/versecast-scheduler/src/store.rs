//! In-memory preference store.
//!
//! Copy-on-write: `snapshot()` hands out the current `Arc<Vec<_>>`, and `add`
//! clones the vector only when a snapshot is still alive. A tick iterating a
//! snapshot never sees, or blocks on, a concurrent append.

use std::sync::{Arc, RwLock};

use versecast_core::error::Result;
use versecast_core::types::{Preference, PreferenceRequest};

#[derive(Debug, Clone, Default)]
pub struct PreferenceStore {
    inner: Arc<RwLock<Arc<Vec<Preference>>>>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append. No deduplication.
    pub fn add(&self, request: PreferenceRequest) -> Result<Preference> {
        let preference = Preference::try_from(request)?;
        self.insert(preference.clone());
        tracing::info!(
            "Preference {} added: {} via {} ({})",
            preference.id,
            preference.time_of_day,
            preference.channel,
            preference.translation
        );
        Ok(preference)
    }

    /// Append an already validated preference.
    pub fn insert(&self, preference: Preference) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        Arc::make_mut(&mut *guard).push(preference);
    }

    /// Point-in-time view of every stored preference.
    pub fn snapshot(&self) -> Arc<Vec<Preference>> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
