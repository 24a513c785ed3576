//! Submission failure tiers: fatal errors abort, warnings are collected.

use serde::Serialize;

use crate::infrastructure::ports::RepoError;

use super::saga::SagaStep;

/// Failure of a single saga step.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("no {0} is available")]
    MissingPrerequisite(&'static str),
}

impl StepError {
    pub(super) fn serialization(e: serde_json::Error) -> Self {
        Self::Repo(RepoError::serialization(e))
    }
}

/// Errors that abort a submission.
///
/// Rows written before the failure stay in the store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmissionError {
    #[error("You need to be signed in to save this profile")]
    NotSignedIn,
    #[error("The family could not be set up: {0}")]
    FamilyResolution(#[source] StepError),
    #[error("The child profile could not be saved: {0}")]
    ChildProfile(#[source] StepError),
    #[error("Saving stopped at {step}: {source}")]
    Aborted {
        step: SagaStep,
        #[source]
        source: StepError,
    },
}

impl SubmissionError {
    pub(super) fn fatal(step: SagaStep, source: StepError) -> Self {
        match step {
            SagaStep::ResolveFamily => Self::FamilyResolution(source),
            SagaStep::CreateChildProfile => Self::ChildProfile(source),
            step => Self::Aborted { step, source },
        }
    }
}

/// A secondary write that failed without stopping the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionWarning {
    pub step: SagaStep,
    pub message: String,
}

impl std::fmt::Display for SubmissionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.step, self.message)
    }
}
