//! Debounced autosave.

use std::sync::Arc;
use std::time::Duration;

use storykin_domain::Draft;
use tokio::task::JoinHandle;

use super::DraftPersistence;

/// Coalesces bursts of edits into one write after a quiet period.
///
/// At most one write is pending; scheduling again aborts it and restarts the
/// timer with the newer draft. Dropping the debouncer cancels the pending write.
pub struct AutosaveDebouncer {
    persistence: Arc<DraftPersistence>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl AutosaveDebouncer {
    pub fn new(persistence: Arc<DraftPersistence>, delay: Duration) -> Self {
        Self {
            persistence,
            delay,
            pending: None,
        }
    }

    pub fn schedule(&mut self, draft: Draft) {
        if !self.persistence.is_active() {
            return;
        }
        self.cancel();

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let persistence = self.persistence.clone();
                let delay = self.delay;
                self.pending = Some(runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    persistence.save(&draft);
                }));
            }
            Err(_) => {
                tracing::debug!("No async runtime, saving draft immediately");
                self.persistence.save(&draft);
            }
        }
    }

    /// Drops the pending timer and writes `draft` now.
    pub fn flush(&mut self, draft: &Draft) {
        self.cancel();
        self.persistence.save(draft);
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for AutosaveDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::KeyValueStore;
    use crate::infrastructure::storage::MemoryKeyValueStore;
    use crate::use_cases::draft::DraftCache;
    use storykin_domain::WizardMode;

    fn debouncer(storage: &MemoryKeyValueStore, mode: WizardMode) -> AutosaveDebouncer {
        let cache = Arc::new(DraftCache::new(Arc::new(storage.clone()), "draft"));
        let persistence = Arc::new(DraftPersistence::new(cache, mode, true));
        AutosaveDebouncer::new(persistence, Duration::from_millis(500))
    }

    fn named(name: &str) -> Draft {
        let mut draft = Draft::new(WizardMode::Create);
        draft.basic_info.first_name = name.to_string();
        draft
    }

    fn cached_name(storage: &MemoryKeyValueStore) -> Option<String> {
        storage
            .get("draft")
            .expect("get")
            .map(|raw| serde_json::from_str::<Draft>(&raw).expect("draft json"))
            .map(|draft| draft.basic_info.first_name)
    }

    #[tokio::test(start_paused = true)]
    async fn bursts_coalesce_into_the_last_draft() {
        let storage = MemoryKeyValueStore::new();
        let mut autosave = debouncer(&storage, WizardMode::Create);

        autosave.schedule(named("A"));
        tokio::time::sleep(Duration::from_millis(300)).await;
        autosave.schedule(named("Ad"));
        tokio::time::sleep(Duration::from_millis(300)).await;
        autosave.schedule(named("Ada"));

        // 600ms after the first edit, but only 0ms after the last
        assert_eq!(cached_name(&storage), None);
        assert!(autosave.is_pending());

        tokio::time::sleep(Duration::from_millis(501)).await;
        assert_eq!(cached_name(&storage), Some("Ada".to_string()));
        assert!(!autosave.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels_the_pending_write() {
        let storage = MemoryKeyValueStore::new();
        let mut autosave = debouncer(&storage, WizardMode::Gift);
        autosave.schedule(named("Lou"));
        drop(autosave);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(cached_name(&storage), None);
    }

    #[tokio::test(start_paused = true)]
    async fn edit_mode_schedules_nothing() {
        let storage = MemoryKeyValueStore::new();
        let mut autosave = debouncer(&storage, WizardMode::Edit);
        autosave.schedule(named("Max"));
        assert!(!autosave.is_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(cached_name(&storage), None);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_writes_at_once_and_drops_the_timer() {
        let storage = MemoryKeyValueStore::new();
        let mut autosave = debouncer(&storage, WizardMode::Create);
        autosave.schedule(named("Ad"));

        autosave.flush(&named("Ada"));

        assert_eq!(cached_name(&storage), Some("Ada".to_string()));
        assert!(!autosave.is_pending());
        storage.remove("draft").expect("remove");
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(cached_name(&storage), None);
    }

    #[test]
    fn without_a_runtime_the_draft_is_saved_immediately() {
        let storage = MemoryKeyValueStore::new();
        let mut autosave = debouncer(&storage, WizardMode::Create);
        autosave.schedule(named("Noor"));
        assert_eq!(cached_name(&storage), Some("Noor".to_string()));
    }
}
