//! Wizard rules that do not need I/O: the step graph, per-step validation and
//! pending type selections.

mod pending;
mod step;
mod validation;

pub use pending::PendingSelections;
pub use step::{next_step, previous_step, step_path, WizardMode, WizardStep};
pub use validation::validate_step;
