//! Use cases - User story orchestration.
//!
//! - `wizard` - the editing session the user walks through
//! - `draft` - autosave and restore of the in-progress draft
//! - `lookup` - selection tokens to store lookup ids
//! - `submission` - writing a finished draft to the store

pub mod draft;
pub mod lookup;
pub mod submission;
pub mod wizard;

pub use draft::{AutosaveDebouncer, DraftCache, DraftPersistence};
pub use lookup::LookupResolver;
pub use submission::{
    SubmissionError, SubmissionOutcome, SubmissionReport, SubmissionRepos, SubmissionWarning,
    SubmitChildProfile,
};
pub use wizard::{WizardError, WizardOptions, WizardSession};
