//! Child profile submission.
//!
//! Flattens a finished draft into family, child, relative, pet and comforter
//! rows plus the join rows between them. Writes run one at a time in saga
//! order; only the family and child profile steps can abort. There is no
//! rollback: rows written before a fatal failure stay in the store.

mod error;
mod payload;
mod saga;
mod steps;


pub use error::{StepError, SubmissionError, SubmissionWarning};
pub use saga::{plan, SagaStep, Severity};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use storykin_domain::{
    ChildId, Draft, FamilyId, FamilyMemberId, LocalId, SelectionCategory, UserId, WizardMode,
};

use crate::infrastructure::ports::{
    ChildPetLink, ChildRepo, ComforterRepo, Destination, FamilyMemberRepo, FamilyRepo, LinkRepo,
    LookupRepo, NavigatorPort, Notification, NotificationPort, PetRepo, ProfileRepo, RandomPort,
    SessionPort,
};
use crate::use_cases::draft::DraftCache;
use crate::use_cases::lookup::LookupResolver;

/// Store ports the submission writes through.
#[derive(Clone)]
pub struct SubmissionRepos {
    pub profiles: Arc<dyn ProfileRepo>,
    pub families: Arc<dyn FamilyRepo>,
    pub members: Arc<dyn FamilyMemberRepo>,
    pub children: Arc<dyn ChildRepo>,
    pub pets: Arc<dyn PetRepo>,
    pub comforters: Arc<dyn ComforterRepo>,
    pub lookups: Arc<dyn LookupRepo>,
    pub links: Arc<dyn LinkRepo>,
}

impl SubmissionRepos {
    /// Every port served by one store.
    pub fn from_store<S>(store: S) -> Self
    where
        S: ProfileRepo
            + FamilyRepo
            + FamilyMemberRepo
            + ChildRepo
            + PetRepo
            + ComforterRepo
            + LookupRepo
            + LinkRepo
            + 'static,
    {
        let store = Arc::new(store);
        Self {
            profiles: store.clone(),
            families: store.clone(),
            members: store.clone(),
            children: store.clone(),
            pets: store.clone(),
            comforters: store.clone(),
            lookups: store.clone(),
            links: store,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionCounts {
    pub relatives_created: usize,
    pub relatives_linked: usize,
    pub preferences_linked: Vec<(SelectionCategory, usize)>,
    pub pets_created: usize,
    pub pets_linked: usize,
    pub comforters_created: usize,
    pub comforters_updated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
    pub family_id: FamilyId,
    pub family_created: bool,
    pub child_id: ChildId,
    pub counts: SubmissionCounts,
    pub warnings: Vec<SubmissionWarning>,
    pub destination: Destination,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Completed(SubmissionReport),
    /// Another submission was still running; nothing was written.
    AlreadyInFlight,
}

/// Latch held for the duration of one submission.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// State threaded through the saga steps.
struct SagaContext<'a> {
    draft: &'a Draft,
    user_id: UserId,
    family_id: Option<FamilyId>,
    family_created: bool,
    child_id: Option<ChildId>,
    created_relatives: Vec<(LocalId, FamilyMemberId)>,
    /// Join row template per created pet, keyed by its draft-local id.
    created_pets: Vec<(LocalId, ChildPetLink)>,
    counts: SubmissionCounts,
    warnings: Vec<SubmissionWarning>,
}

impl<'a> SagaContext<'a> {
    fn new(draft: &'a Draft, user_id: UserId) -> Self {
        Self {
            draft,
            user_id,
            family_id: None,
            family_created: false,
            child_id: None,
            created_relatives: Vec::new(),
            created_pets: Vec::new(),
            counts: SubmissionCounts::default(),
            warnings: Vec::new(),
        }
    }

    fn is_edit(&self) -> bool {
        self.draft.mode == WizardMode::Edit
    }

    fn family(&self) -> Result<FamilyId, StepError> {
        self.family_id.ok_or(StepError::MissingPrerequisite("family"))
    }

    fn child(&self) -> Result<ChildId, StepError> {
        self.child_id
            .ok_or(StepError::MissingPrerequisite("child profile"))
    }

    fn created_relative(&self, local_id: LocalId) -> Option<FamilyMemberId> {
        self.created_relatives
            .iter()
            .find(|(local, _)| *local == local_id)
            .map(|(_, id)| *id)
    }

    fn created_pet(&self, local_id: LocalId) -> Option<&ChildPetLink> {
        self.created_pets
            .iter()
            .find(|(local, _)| *local == local_id)
            .map(|(_, link)| link)
    }
}

/// Submits a finished draft.
///
/// Single-flight: a call made while another is running returns
/// [`SubmissionOutcome::AlreadyInFlight`] without touching the store.
pub struct SubmitChildProfile {
    repos: SubmissionRepos,
    lookup: LookupResolver,
    session: Arc<dyn SessionPort>,
    draft_cache: Arc<DraftCache>,
    notifier: Arc<dyn NotificationPort>,
    navigator: Arc<dyn NavigatorPort>,
    random: Arc<dyn RandomPort>,
    redirect_delay: Duration,
    in_flight: AtomicBool,
}

impl SubmitChildProfile {
    pub fn new(
        repos: SubmissionRepos,
        session: Arc<dyn SessionPort>,
        draft_cache: Arc<DraftCache>,
        notifier: Arc<dyn NotificationPort>,
        navigator: Arc<dyn NavigatorPort>,
        random: Arc<dyn RandomPort>,
        redirect_delay: Duration,
    ) -> Self {
        Self {
            lookup: LookupResolver::new(repos.lookups.clone()),
            repos,
            session,
            draft_cache,
            notifier,
            navigator,
            random,
            redirect_delay,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Execute the submission.
    ///
    /// # Returns
    /// * `Ok(SubmissionOutcome::Completed)` - Family and child exist; the report lists any warnings
    /// * `Ok(SubmissionOutcome::AlreadyInFlight)` - Ignored duplicate call
    /// * `Err(SubmissionError)` - Aborted; the draft cache is left in place
    pub async fn execute(&self, draft: &Draft) -> Result<SubmissionOutcome, SubmissionError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("Submission already in flight, ignoring");
            return Ok(SubmissionOutcome::AlreadyInFlight);
        };

        match self.run(draft).await {
            Ok(report) => Ok(SubmissionOutcome::Completed(report)),
            Err(e) => {
                tracing::error!(error = %e, mode = %draft.mode, "Submission failed");
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    async fn run(&self, draft: &Draft) -> Result<SubmissionReport, SubmissionError> {
        // 1. Session
        let user_id = self
            .session
            .current_user_id()
            .ok_or(SubmissionError::NotSignedIn)?;

        tracing::info!(user_id = %user_id, mode = %draft.mode, "Submitting child profile");

        // 2-8. Saga
        let mut ctx = SagaContext::new(draft, user_id);
        for step in plan(draft.mode) {
            if let Err(source) = self.run_step(step, &mut ctx).await {
                match step.severity() {
                    Severity::Fatal => return Err(SubmissionError::fatal(step, source)),
                    Severity::Warning => {
                        let message = format!("{} ({})", step.failure_message(), source);
                        self.warn(&mut ctx, step, message);
                    }
                }
            }
        }

        // 9. Finalize
        self.finalize(ctx).await
    }

    async fn finalize(&self, ctx: SagaContext<'_>) -> Result<SubmissionReport, SubmissionError> {
        let family_id = ctx.family().map_err(SubmissionError::FamilyResolution)?;
        let child_id = ctx.child().map_err(SubmissionError::ChildProfile)?;

        if ctx.draft.mode.uses_draft_cache() {
            if let Err(e) = self.draft_cache.clear() {
                tracing::warn!(error = %e, "Failed to clear the draft cache");
            }
        }

        let message = if ctx.warnings.is_empty() {
            format!("{}'s profile is saved", ctx.draft.basic_info.first_name.trim())
        } else {
            format!(
                "{}'s profile is saved, but {} detail(s) could not be stored",
                ctx.draft.basic_info.first_name.trim(),
                ctx.warnings.len()
            )
        };
        self.notifier.notify(Notification::success(message));

        tracing::info!(
            family_id = %family_id,
            child_id = %child_id,
            family_created = ctx.family_created,
            warnings = ctx.warnings.len(),
            "Child profile submitted"
        );

        if !self.redirect_delay.is_zero() {
            tokio::time::sleep(self.redirect_delay).await;
        }

        let destination = match ctx.draft.mode {
            WizardMode::Gift => Destination::GiftNextStep,
            WizardMode::Create | WizardMode::Edit => Destination::ReadyToStart,
        };
        self.navigator.navigate(destination);

        Ok(SubmissionReport {
            family_id,
            family_created: ctx.family_created,
            child_id,
            counts: ctx.counts,
            warnings: ctx.warnings,
            destination,
        })
    }

    /// Records a recoverable failure and tells the user about it.
    fn warn(&self, ctx: &mut SagaContext<'_>, step: SagaStep, message: impl Into<String>) {
        let warning = SubmissionWarning {
            step,
            message: message.into(),
        };
        tracing::warn!(step = %step, "{}", warning.message);
        self.notifier
            .notify(Notification::warning(warning.message.clone()));
        ctx.warnings.push(warning);
    }
}
