//! The wizard session: one draft being edited step by step.
//!
//! The session owns the draft, the pending type gestures and the autosave
//! timer. Every mutation goes through a method here so the draft is saved
//! after each burst of edits.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use storykin_domain::catalog::is_custom_slot;
use storykin_domain::wizard::{next_step, previous_step};
use storykin_domain::{
    BasicInfo, ChildGender, ChildId, DomainError, Draft, FamilyMemberId, HeightForAge, LocalId,
    PendingSelections, Pet, PetId, PetType, Relative, RelativeType, SelectionCategory, Toy,
    ToyType, WizardMode, WizardStep,
};

use crate::infrastructure::ports::{ClockPort, Notification, NotificationPort};
use crate::use_cases::draft::{AutosaveDebouncer, DraftPersistence};
use crate::use_cases::submission::{SubmissionError, SubmissionOutcome, SubmitChildProfile};

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("The profile can only be saved from the review step (currently on {step})")]
    NotAtReview { step: WizardStep },
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// How a wizard session starts.
#[derive(Debug, Clone, Default)]
pub struct WizardOptions {
    pub mode: WizardMode,
    /// Step requested by the caller.
    pub initial_step: Option<WizardStep>,
    /// Step requested by the route the user arrived through.
    pub target_step: Option<WizardStep>,
    /// Draft to edit instead of a cached or empty one.
    pub hydrate: Option<Draft>,
}

impl WizardOptions {
    pub fn new(mode: WizardMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_initial_step(mut self, step: WizardStep) -> Self {
        self.initial_step = Some(step);
        self
    }

    pub fn with_target_step(mut self, step: WizardStep) -> Self {
        self.target_step = Some(step);
        self
    }

    pub fn hydrated(mut self, draft: Draft) -> Self {
        self.hydrate = Some(draft);
        self
    }
}

pub struct WizardSession {
    draft: Draft,
    pending: PendingSelections,
    autosave: AutosaveDebouncer,
    notifier: Arc<dyn NotificationPort>,
    clock: Arc<dyn ClockPort>,
}

impl WizardSession {
    /// Opens a session.
    ///
    /// The draft comes from `options.hydrate`, else the cache, else starts
    /// empty. An explicit initial or target step wins over the cached step.
    pub fn open(
        options: WizardOptions,
        persistence: Arc<DraftPersistence>,
        autosave_delay: Duration,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let today = clock.today();
        let mut draft = match options.hydrate {
            Some(mut draft) => {
                draft.mode = options.mode;
                draft.basic_info.refresh_age(today);
                draft
            }
            None => persistence
                .restore(today)
                .unwrap_or_else(|| Draft::new(options.mode)),
        };
        if let Some(step) = options.initial_step.or(options.target_step) {
            draft.step = step;
        }

        tracing::info!(mode = %draft.mode, step = %draft.step, "Wizard opened");

        Self {
            draft,
            pending: PendingSelections::default(),
            autosave: AutosaveDebouncer::new(persistence, autosave_delay),
            notifier,
            clock,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn step(&self) -> WizardStep {
        self.draft.step
    }

    pub fn mode(&self) -> WizardMode {
        self.draft.mode
    }

    pub fn pending(&self) -> &PendingSelections {
        &self.pending
    }

    pub fn has_pending_autosave(&self) -> bool {
        self.autosave.is_pending()
    }

    fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn touch(&mut self) {
        self.autosave.schedule(self.draft.clone());
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Validates the current step and moves forward.
    pub fn go_next(&mut self) -> Result<WizardStep, WizardError> {
        let from = self.draft.step;
        if let Err(e) = self.draft.validate_step(from, self.today()) {
            tracing::debug!(step = %from, error = %e, "Step is incomplete");
            self.notifier.notify(Notification::error(e.to_string()));
            return Err(e.into());
        }
        let to = next_step(self.draft.mode, from).ok_or_else(|| {
            DomainError::invalid_step_transition(format!("{} is the last step", from))
        })?;
        Ok(self.transition(to))
    }

    pub fn go_previous(&mut self) -> Result<WizardStep, WizardError> {
        let from = self.draft.step;
        let to = previous_step(self.draft.mode, from).ok_or_else(|| {
            DomainError::invalid_step_transition(format!("{} is the first step", from))
        })?;
        Ok(self.transition(to))
    }

    /// Jumps straight to `step` without validating, e.g. from the review screen.
    pub fn go_to_step(&mut self, step: WizardStep) -> WizardStep {
        self.transition(step)
    }

    pub fn go_to_index(&mut self, index: u8) -> Result<WizardStep, WizardError> {
        let step = WizardStep::from_index(index)?;
        Ok(self.transition(step))
    }

    fn transition(&mut self, to: WizardStep) -> WizardStep {
        let from = self.draft.step;
        self.draft.step = to;
        tracing::info!(from = %from, to = %to, mode = %self.draft.mode, "Wizard step changed");
        self.notifier
            .notify(Notification::info(format!("{} completed", from.title())));
        self.touch();
        to
    }

    // =========================================================================
    // Basic info and preferences
    // =========================================================================

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.draft.basic_info.first_name = first_name.into();
        self.touch();
    }

    pub fn set_gender(&mut self, gender: ChildGender) {
        self.draft.basic_info.gender = Some(gender);
        self.touch();
    }

    pub fn set_birth_date(&mut self, birth_date: Option<NaiveDate>) -> Result<(), WizardError> {
        let today = self.today();
        self.draft.set_birth_date(birth_date, today)?;
        self.touch();
        Ok(())
    }

    /// Appearance and other free-form basic info fields.
    pub fn update_basic_info(&mut self, update: impl FnOnce(&mut BasicInfo)) {
        update(&mut self.draft.basic_info);
        let today = self.today();
        self.draft.basic_info.refresh_age(today);
        self.touch();
    }

    pub fn toggle_selection(
        &mut self,
        category: SelectionCategory,
        token: &str,
    ) -> Result<bool, WizardError> {
        let selected = self.draft.toggle_selection(category, token)?;
        self.touch();
        Ok(selected)
    }

    pub fn set_height_for_age(&mut self, height_for_age: Option<HeightForAge>) {
        self.draft.personality.height_for_age = height_for_age;
        self.touch();
    }

    /// Text for a selected `other*` world slot.
    pub fn set_custom_world(&mut self, slot: &str, text: impl Into<String>) -> Result<(), WizardError> {
        if !is_custom_slot(slot) {
            return Err(DomainError::parse(format!("'{}' is not a custom world slot", slot)).into());
        }
        if !self.draft.worlds.worlds.iter().any(|w| w == slot) {
            return Err(DomainError::validation("Select the world before describing it").into());
        }
        self.draft
            .worlds
            .custom_values
            .insert(slot.to_string(), text.into());
        self.touch();
        Ok(())
    }

    // =========================================================================
    // Family
    // =========================================================================

    pub fn select_relative_type(&mut self, relative_type: RelativeType) {
        self.pending.select_relative_type(relative_type);
    }

    /// Adds a relative of the pending type.
    pub fn confirm_relative(&mut self, nickname: impl Into<String>) -> Result<LocalId, WizardError> {
        let relative_type = self.pending.take_relative_type()?;
        let relative = Relative::new(relative_type).with_nickname(nickname);
        let local_id = relative.local_id;
        self.draft.family.relatives.push(relative);
        self.touch();
        Ok(local_id)
    }

    pub fn update_relative(
        &mut self,
        local_id: LocalId,
        update: impl FnOnce(&mut Relative),
    ) -> Result<(), WizardError> {
        let relative = self
            .draft
            .family
            .relative_mut(local_id)
            .ok_or_else(|| DomainError::validation("This family member was removed"))?;
        update(relative);
        self.touch();
        Ok(())
    }

    pub fn remove_relative(&mut self, local_id: LocalId) -> Option<Relative> {
        let removed = self.draft.family.remove_relative(local_id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    pub fn toggle_existing_relative(&mut self, id: FamilyMemberId) -> bool {
        let selected = self.draft.family.toggle_existing(id);
        self.touch();
        selected
    }

    /// Other children of the family the new relative should also be linked to.
    pub fn set_relative_child_links(&mut self, local_id: LocalId, children: Vec<ChildId>) {
        if children.is_empty() {
            self.draft.family.relative_child_links.remove(&local_id);
        } else {
            self.draft
                .family
                .relative_child_links
                .insert(local_id, children);
        }
        self.touch();
    }

    // =========================================================================
    // Pets
    // =========================================================================

    pub fn set_has_pets(&mut self, has_pets: bool) {
        self.draft.pets.set_has_pets(has_pets);
        if !has_pets {
            self.draft.pets.pet_child_links.clear();
        }
        self.touch();
    }

    pub fn select_pet_type(&mut self, pet_type: PetType) {
        self.pending.select_pet_type(pet_type);
    }

    pub fn confirm_pet(&mut self, name: impl Into<String>) -> Result<LocalId, WizardError> {
        let pet_type = self.pending.take_pet_type()?;
        let local_id = self.draft.pets.add_pet(Pet::new(pet_type, name));
        self.touch();
        Ok(local_id)
    }

    pub fn update_pet(
        &mut self,
        local_id: LocalId,
        update: impl FnOnce(&mut Pet),
    ) -> Result<(), WizardError> {
        let pet = self
            .draft
            .pets
            .pet_mut(local_id)
            .ok_or_else(|| DomainError::validation("This pet was removed"))?;
        update(pet);
        self.touch();
        Ok(())
    }

    pub fn remove_pet(&mut self, local_id: LocalId) -> Option<Pet> {
        let removed = self.draft.pets.remove_pet(local_id);
        if removed.is_some() {
            self.draft.pets.pet_child_links.remove(&local_id);
            self.touch();
        }
        removed
    }

    pub fn toggle_existing_pet(&mut self, id: PetId) -> bool {
        let selected = self.draft.pets.toggle_existing(id);
        self.touch();
        selected
    }

    pub fn set_pet_child_links(&mut self, local_id: LocalId, children: Vec<ChildId>) {
        if children.is_empty() {
            self.draft.pets.pet_child_links.remove(&local_id);
        } else {
            self.draft.pets.pet_child_links.insert(local_id, children);
        }
        self.touch();
    }

    // =========================================================================
    // Comforting objects
    // =========================================================================

    pub fn set_has_toys(&mut self, has_toys: bool) {
        self.draft.toys.set_has_toys(has_toys);
        self.touch();
    }

    pub fn select_toy_type(&mut self, toy_type: ToyType) {
        self.pending.select_toy_type(toy_type);
    }

    pub fn confirm_toy(&mut self, name: impl Into<String>) -> Result<LocalId, WizardError> {
        let toy_type = self.pending.take_toy_type()?;
        let local_id = self.draft.toys.add_toy(Toy::new(toy_type, name));
        self.touch();
        Ok(local_id)
    }

    pub fn update_toy(
        &mut self,
        local_id: LocalId,
        update: impl FnOnce(&mut Toy),
    ) -> Result<(), WizardError> {
        let toy = self
            .draft
            .toys
            .toy_mut(local_id)
            .ok_or_else(|| DomainError::validation("This object was removed"))?;
        update(toy);
        self.touch();
        Ok(())
    }

    pub fn toggle_toy_role(&mut self, local_id: LocalId, role: &str) -> Result<bool, WizardError> {
        let toy = self
            .draft
            .toys
            .toy_mut(local_id)
            .ok_or_else(|| DomainError::validation("This object was removed"))?;
        let selected = toy.toggle_role(role)?;
        self.touch();
        Ok(selected)
    }

    pub fn remove_toy(&mut self, local_id: LocalId) -> Option<Toy> {
        let removed = self.draft.toys.remove_toy(local_id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Hands the draft to the submission pipeline. Only allowed on the review step.
    ///
    /// The pending autosave is written out first, so a failed submission can
    /// be retried from the cache. Success clears the cache afterwards.
    pub async fn submit(
        &mut self,
        submitter: &SubmitChildProfile,
    ) -> Result<SubmissionOutcome, WizardError> {
        if !self.draft.step.is_terminal() {
            return Err(WizardError::NotAtReview {
                step: self.draft.step,
            });
        }
        self.autosave.flush(&self.draft);
        Ok(submitter.execute(&self.draft).await?)
    }

    /// Ends the session without saving again.
    pub fn close(mut self) -> Draft {
        self.autosave.cancel();
        tracing::debug!(step = %self.draft.step, "Wizard closed");
        std::mem::take(&mut self.draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, FixedRandom};
    use crate::infrastructure::memory_store::{InMemoryStore, StoreTable};
    use crate::infrastructure::notifications::{
        CollectingNotifier, LoggingNavigator, StaticSession,
    };
    use crate::infrastructure::ports::{KeyValueStore, NotificationLevel};
    use crate::infrastructure::storage::MemoryKeyValueStore;
    use crate::use_cases::draft::DraftCache;
    use crate::use_cases::submission::SubmissionRepos;
    use storykin_domain::UserId;

    const KEY: &str = "wizard_draft";
    const DEBOUNCE: Duration = Duration::from_millis(500);

    struct Fixture {
        storage: MemoryKeyValueStore,
        cache: Arc<DraftCache>,
        notifier: Arc<CollectingNotifier>,
    }

    impl Fixture {
        fn new() -> Self {
            let storage = MemoryKeyValueStore::new();
            Self {
                cache: Arc::new(DraftCache::new(Arc::new(storage.clone()), KEY)),
                storage,
                notifier: Arc::new(CollectingNotifier::default()),
            }
        }

        fn open(&self, options: WizardOptions) -> WizardSession {
            let persistence = Arc::new(DraftPersistence::new(
                self.cache.clone(),
                options.mode,
                true,
            ));
            WizardSession::open(
                options,
                persistence,
                DEBOUNCE,
                self.notifier.clone(),
                Arc::new(FixedClock::on(2026, 10, 19)),
            )
        }

        fn cached(&self) -> Option<Draft> {
            self.cache.load()
        }
    }

    fn fill_basic_info(session: &mut WizardSession) {
        session.set_first_name("Ada");
        session.set_gender(ChildGender::Girl);
        session
            .set_birth_date(NaiveDate::from_ymd_opt(2020, 5, 4))
            .expect("past date");
    }

    #[tokio::test]
    async fn when_step_is_incomplete_then_next_is_blocked_with_error_notification() {
        let fixture = Fixture::new();
        let mut session = fixture.open(WizardOptions::new(WizardMode::Create));

        let err = session.go_next().expect_err("expected an error");

        assert!(matches!(err, WizardError::Validation(_)));
        assert_eq!(session.step(), WizardStep::BasicInfo);
        assert_eq!(fixture.notifier.count(NotificationLevel::Error), 1);
    }

    #[tokio::test]
    async fn when_step_is_valid_then_next_advances_and_reports_progress() {
        let fixture = Fixture::new();
        let mut session = fixture.open(WizardOptions::new(WizardMode::Create));
        fill_basic_info(&mut session);

        assert_eq!(session.go_next().expect("valid"), WizardStep::Personality);
        assert_eq!(fixture.notifier.count(NotificationLevel::Info), 1);
    }

    #[tokio::test]
    async fn when_editing_then_family_and_pets_are_skipped_both_ways() {
        let fixture = Fixture::new();
        let mut session = fixture.open(
            WizardOptions::new(WizardMode::Edit)
                .hydrated(Draft::for_edit(ChildId::new()))
                .with_initial_step(WizardStep::Personality),
        );
        session
            .toggle_selection(SelectionCategory::Superpowers, "courage")
            .expect("select");

        assert_eq!(session.go_next().expect("valid"), WizardStep::Toys);
        assert_eq!(session.go_previous().expect("back"), WizardStep::Personality);
    }

    #[tokio::test]
    async fn when_at_either_end_then_moving_past_it_fails() {
        let fixture = Fixture::new();
        let mut session = fixture.open(WizardOptions::new(WizardMode::Create));
        assert!(matches!(
            session.go_previous(),
            Err(WizardError::Validation(DomainError::InvalidStepTransition(_)))
        ));

        session.go_to_step(WizardStep::Review);
        assert!(matches!(
            session.go_next(),
            Err(WizardError::Validation(DomainError::InvalidStepTransition(_)))
        ));
        assert!(session.go_to_index(7).is_err());
        assert_eq!(session.step(), WizardStep::Review);
    }

    #[tokio::test]
    async fn when_cache_holds_draft_then_it_is_restored_unless_a_step_is_requested() {
        let fixture = Fixture::new();
        let mut cached = Draft::new(WizardMode::Create);
        cached.step = WizardStep::Pets;
        cached.basic_info.first_name = "Ada".into();
        fixture.cache.store(&cached).expect("seed cache");

        let restored = fixture.open(WizardOptions::new(WizardMode::Create));
        assert_eq!(restored.step(), WizardStep::Pets);
        assert_eq!(restored.draft().basic_info.first_name, "Ada");
        drop(restored);

        let targeted = fixture.open(
            WizardOptions::new(WizardMode::Create).with_target_step(WizardStep::Worlds),
        );
        assert_eq!(targeted.step(), WizardStep::Worlds);
        assert_eq!(targeted.draft().basic_info.first_name, "Ada");
    }

    #[tokio::test(start_paused = true)]
    async fn when_edits_burst_then_one_autosave_lands_after_the_quiet_period() {
        let fixture = Fixture::new();
        let mut session = fixture.open(WizardOptions::new(WizardMode::Gift));

        session.set_first_name("A");
        session.set_first_name("Ad");
        tokio::time::sleep(Duration::from_millis(300)).await;
        session.set_first_name("Ada");
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(fixture.cached().is_none());

        tokio::time::sleep(Duration::from_millis(300)).await;
        let cached = fixture.cached().expect("autosaved");
        assert_eq!(cached.basic_info.first_name, "Ada");
        assert!(!session.has_pending_autosave());
    }

    #[tokio::test(start_paused = true)]
    async fn when_editing_then_nothing_is_written_to_the_cache() {
        let fixture = Fixture::new();
        let mut session = fixture.open(
            WizardOptions::new(WizardMode::Edit).hydrated(Draft::for_edit(ChildId::new())),
        );

        session.set_first_name("Ada");
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(fixture.storage.get(KEY).expect("storage"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn when_session_closes_then_pending_autosave_is_dropped() {
        let fixture = Fixture::new();
        let mut session = fixture.open(WizardOptions::new(WizardMode::Create));
        session.set_first_name("Ada");
        assert!(session.has_pending_autosave());

        let draft = session.close();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(draft.basic_info.first_name, "Ada");
        assert!(fixture.cached().is_none());
    }

    #[tokio::test]
    async fn when_no_type_is_pending_then_confirm_fails() {
        let fixture = Fixture::new();
        let mut session = fixture.open(WizardOptions::new(WizardMode::Create));

        assert!(session.confirm_relative("Mamie").is_err());

        session.select_relative_type(RelativeType::Grandmother);
        let id = session.confirm_relative("Mamie").expect("pending type");
        assert!(session.pending().relative_type().is_none());
        assert_eq!(
            session.draft().family.relative(id).map(|r| r.nickname.as_str()),
            Some("Mamie")
        );

        session.select_pet_type(PetType::Cat);
        let pet = session.confirm_pet("Minou").expect("pending type");
        session.set_pet_child_links(pet, vec![ChildId::new()]);
        session.set_has_pets(false);
        assert!(session.draft().pets.pets().is_empty());
        assert!(session.draft().pets.pet_child_links.is_empty());
    }

    #[tokio::test]
    async fn when_custom_world_is_not_selected_then_its_text_is_rejected() {
        let fixture = Fixture::new();
        let mut session = fixture.open(WizardOptions::new(WizardMode::Create));

        assert!(session.set_custom_world("other1", "Candy land").is_err());
        assert!(session.set_custom_world("space", "Candy land").is_err());

        session
            .toggle_selection(SelectionCategory::Worlds, "other1")
            .expect("select");
        session
            .set_custom_world("other1", "Candy land")
            .expect("selected slot");
        assert_eq!(session.draft().worlds.custom_worlds(), vec!["Candy land"]);
    }

    #[tokio::test]
    async fn when_not_on_review_then_submit_is_refused() {
        let fixture = Fixture::new();
        let store = InMemoryStore::with_catalog_lookups();
        let submitter = SubmitChildProfile::new(
            SubmissionRepos::from_store(store.clone()),
            Arc::new(StaticSession::signed_in(UserId::new())),
            fixture.cache.clone(),
            fixture.notifier.clone(),
            Arc::new(LoggingNavigator::new()),
            Arc::new(FixedRandom(0)),
            Duration::ZERO,
        );
        let mut session = fixture.open(WizardOptions::new(WizardMode::Create));

        let err = session.submit(&submitter).await.expect_err("expected an error");

        assert!(matches!(
            err,
            WizardError::NotAtReview {
                step: WizardStep::BasicInfo
            }
        ));
        assert!(store.families().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn when_submitted_from_review_then_cache_stays_cleared() {
        let fixture = Fixture::new();
        let submitter = SubmitChildProfile::new(
            SubmissionRepos::from_store(InMemoryStore::with_catalog_lookups()),
            Arc::new(StaticSession::signed_in(UserId::new())),
            fixture.cache.clone(),
            fixture.notifier.clone(),
            Arc::new(LoggingNavigator::new()),
            Arc::new(FixedRandom(0)),
            Duration::ZERO,
        );
        let mut session = fixture.open(WizardOptions::new(WizardMode::Create));
        fill_basic_info(&mut session);
        tokio::time::sleep(DEBOUNCE * 2).await;
        assert!(fixture.cached().is_some());
        session.go_to_step(WizardStep::Review);
        assert!(session.has_pending_autosave());

        let outcome = session.submit(&submitter).await.expect("submit");
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(matches!(outcome, SubmissionOutcome::Completed(_)));
        assert!(fixture.cached().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn when_submission_fails_then_latest_edits_are_cached_for_retry() {
        let fixture = Fixture::new();
        let store = InMemoryStore::with_catalog_lookups();
        store.fail_writes_to(StoreTable::Children);
        let submitter = SubmitChildProfile::new(
            SubmissionRepos::from_store(store.clone()),
            Arc::new(StaticSession::signed_in(UserId::new())),
            fixture.cache.clone(),
            fixture.notifier.clone(),
            Arc::new(LoggingNavigator::new()),
            Arc::new(FixedRandom(0)),
            Duration::ZERO,
        );
        let mut session = fixture.open(WizardOptions::new(WizardMode::Create));
        fill_basic_info(&mut session);
        tokio::time::sleep(DEBOUNCE * 2).await;
        session.set_first_name("Adaline");
        session.go_to_step(WizardStep::Review);

        let err = session.submit(&submitter).await.expect_err("expected an error");
        session.close();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(matches!(err, WizardError::Submission(_)));
        let cached = fixture.cached().expect("draft kept");
        assert_eq!(cached.basic_info.first_name, "Adaline");
        assert_eq!(cached.step, WizardStep::Review);
    }
}
