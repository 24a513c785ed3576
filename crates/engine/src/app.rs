//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    config::AppConfig,
    ports::{ClockPort, KeyValueStore, NavigatorPort, NotificationPort, RandomPort, SessionPort},
};
use crate::use_cases::{
    DraftCache, DraftPersistence, SubmissionRepos, SubmitChildProfile, WizardOptions,
    WizardSession,
};

/// Main application state.
///
/// Holds the store ports and the use cases built on them. Wizard sessions
/// are opened from here so they share the draft cache and the submitter.
pub struct App {
    pub config: AppConfig,
    pub repositories: SubmissionRepos,
    pub use_cases: UseCases,
    notifier: Arc<dyn NotificationPort>,
    clock: Arc<dyn ClockPort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub draft_cache: Arc<DraftCache>,
    pub submit_child_profile: Arc<SubmitChildProfile>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        config: AppConfig,
        repositories: SubmissionRepos,
        storage: Arc<dyn KeyValueStore>,
        session: Arc<dyn SessionPort>,
        notifier: Arc<dyn NotificationPort>,
        navigator: Arc<dyn NavigatorPort>,
    ) -> Self {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
        let random: Arc<dyn RandomPort> = Arc::new(SystemRandom::new());
        Self::with_ports(config, repositories, storage, session, notifier, navigator, clock, random)
    }

    /// Like [`App::new`] with explicit clock and randomness.
    pub fn with_ports(
        config: AppConfig,
        repositories: SubmissionRepos,
        storage: Arc<dyn KeyValueStore>,
        session: Arc<dyn SessionPort>,
        notifier: Arc<dyn NotificationPort>,
        navigator: Arc<dyn NavigatorPort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let draft_cache = Arc::new(DraftCache::new(storage, config.draft_key.clone()));

        let submit_child_profile = Arc::new(SubmitChildProfile::new(
            repositories.clone(),
            session,
            draft_cache.clone(),
            notifier.clone(),
            navigator,
            random,
            config.redirect_delay,
        ));

        Self {
            use_cases: UseCases {
                draft_cache,
                submit_child_profile,
            },
            repositories,
            config,
            notifier,
            clock,
        }
    }

    /// Opens a wizard session backed by the shared draft cache.
    pub fn open_wizard(&self, options: WizardOptions) -> WizardSession {
        let persistence = Arc::new(DraftPersistence::new(
            self.use_cases.draft_cache.clone(),
            options.mode,
            self.config.autosave_enabled,
        ));
        WizardSession::open(
            options,
            persistence,
            self.config.autosave_debounce,
            self.notifier.clone(),
            self.clock.clone(),
        )
    }
}
