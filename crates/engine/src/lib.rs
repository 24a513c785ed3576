//! Storykin Engine library.
//!
//! Everything behind the child profile wizard: the editing session, draft
//! autosave, and the pipeline that writes a finished profile to the store.
//!
//! ## Structure
//!
//! - `use_cases/` - Wizard session, draft persistence, lookups and submission
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
