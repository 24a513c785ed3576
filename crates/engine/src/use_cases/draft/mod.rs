//! Draft persistence: the key/value cache of the in-progress wizard draft.

mod autosave;

pub use autosave::AutosaveDebouncer;

use std::sync::Arc;

use chrono::NaiveDate;
use storykin_domain::{Draft, WizardMode};

use crate::infrastructure::ports::{KeyValueStore, StorageError};

/// Raw access to the cached draft under one storage key.
pub struct DraftCache {
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl DraftCache {
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the cached draft. Unreadable or corrupt entries count as absent.
    pub fn load(&self) -> Option<Draft> {
        let raw = match self.storage.get(&self.key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read cached draft");
                return None;
            }
        };
        match serde_json::from_str::<Draft>(&raw) {
            Ok(draft) => Some(draft),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Ignoring corrupt cached draft");
                None
            }
        }
    }

    pub fn store(&self, draft: &Draft) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(draft).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set(&self.key, &raw)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }
}

/// Mode-aware gate in front of the cache.
///
/// Edit sessions start from a stored profile and never read or write the
/// cache; neither does any session with autosave turned off.
pub struct DraftPersistence {
    cache: Arc<DraftCache>,
    mode: WizardMode,
    autosave_enabled: bool,
}

impl DraftPersistence {
    pub fn new(cache: Arc<DraftCache>, mode: WizardMode, autosave_enabled: bool) -> Self {
        Self {
            cache,
            mode,
            autosave_enabled,
        }
    }

    pub fn is_active(&self) -> bool {
        self.autosave_enabled && self.mode.uses_draft_cache()
    }

    /// Cached draft rehydrated for this session, if any.
    ///
    /// Dates were already parsed leniently on load; the age bracket is
    /// re-derived against `today` because the cache may be days old.
    pub fn restore(&self, today: NaiveDate) -> Option<Draft> {
        if !self.is_active() {
            return None;
        }
        let mut draft = self.cache.load()?;
        draft.mode = self.mode;
        draft.basic_info.refresh_age(today);
        tracing::info!(step = %draft.step, mode = %self.mode, "Restored cached draft");
        Some(draft)
    }

    /// Writes the draft immediately. Failures are logged, never surfaced.
    pub fn save(&self, draft: &Draft) {
        if !self.is_active() {
            return;
        }
        match self.cache.store(draft) {
            Ok(()) => tracing::debug!(step = %draft.step, "Draft autosaved"),
            Err(e) => tracing::warn!(error = %e, "Failed to autosave draft"),
        }
    }
}
