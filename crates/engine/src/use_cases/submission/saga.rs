//! The ordered list of writes performed on submit.

use serde::Serialize;
use storykin_domain::{SelectionCategory, WizardMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Abort the submission.
    Fatal,
    /// Record a warning and continue with the next step.
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SagaStep {
    ResolveFamily,
    CreateRelatives,
    CreateChildProfile,
    LinkPreferences(SelectionCategory),
    LinkRelatives,
    Pets,
    Comforters,
}

impl SagaStep {
    pub fn severity(&self) -> Severity {
        match self {
            Self::ResolveFamily | Self::CreateChildProfile => Severity::Fatal,
            _ => Severity::Warning,
        }
    }

    /// User-facing description of what failed.
    pub fn failure_message(&self) -> String {
        match self {
            Self::ResolveFamily => "The family could not be set up".to_string(),
            Self::CreateRelatives => "Some family members could not be saved".to_string(),
            Self::CreateChildProfile => "The child profile could not be saved".to_string(),
            Self::LinkPreferences(category) => {
                format!("The selected {} could not be saved", category)
            }
            Self::LinkRelatives => "Family members could not be linked to the child".to_string(),
            Self::Pets => "Pets could not be linked to the child".to_string(),
            Self::Comforters => "Comforting objects could not be saved".to_string(),
        }
    }
}

impl std::fmt::Display for SagaStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResolveFamily => f.write_str("family"),
            Self::CreateRelatives => f.write_str("relatives"),
            Self::CreateChildProfile => f.write_str("child profile"),
            Self::LinkPreferences(category) => write!(f, "{} links", category),
            Self::LinkRelatives => f.write_str("relative links"),
            Self::Pets => f.write_str("pets"),
            Self::Comforters => f.write_str("comforters"),
        }
    }
}

/// Steps for a submission in `mode`, in execution order.
///
/// Edit sessions never author relatives or pets, so those steps are left out.
pub fn plan(mode: WizardMode) -> Vec<SagaStep> {
    let editing = mode == WizardMode::Edit;

    let mut steps = vec![SagaStep::ResolveFamily];
    if !editing {
        steps.push(SagaStep::CreateRelatives);
    }
    steps.push(SagaStep::CreateChildProfile);
    steps.extend(SelectionCategory::ALL.map(SagaStep::LinkPreferences));
    if !editing {
        steps.push(SagaStep::LinkRelatives);
        steps.push(SagaStep::Pets);
    }
    steps.push(SagaStep::Comforters);
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_and_child_come_before_any_link() {
        let steps = plan(WizardMode::Create);
        let child = steps
            .iter()
            .position(|s| *s == SagaStep::CreateChildProfile)
            .expect("child step");
        assert_eq!(steps[0], SagaStep::ResolveFamily);
        assert_eq!(steps[1], SagaStep::CreateRelatives);
        assert!(steps[child + 1..]
            .iter()
            .all(|s| s.severity() == Severity::Warning));
        assert_eq!(steps.len(), 11);
    }

    #[test]
    fn edit_plan_skips_relatives_and_pets() {
        let steps = plan(WizardMode::Edit);
        assert!(!steps.contains(&SagaStep::CreateRelatives));
        assert!(!steps.contains(&SagaStep::LinkRelatives));
        assert!(!steps.contains(&SagaStep::Pets));
        assert!(steps.contains(&SagaStep::Comforters));
        assert_eq!(plan(WizardMode::Gift), plan(WizardMode::Create));
    }

    #[test]
    fn only_family_and_child_are_fatal() {
        let fatal: Vec<SagaStep> = plan(WizardMode::Create)
            .into_iter()
            .filter(|s| s.severity() == Severity::Fatal)
            .collect();
        assert_eq!(fatal, vec![SagaStep::ResolveFamily, SagaStep::CreateChildProfile]);
    }
}
