//! Wizard steps, modes, and the step transition table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Why the wizard is open. Changes the step graph, autosave, and where a
/// successful submission leads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardMode {
    #[default]
    Create,
    Edit,
    Gift,
}

impl WizardMode {
    /// Edit sessions never touch the shared "resume where you left off" cache.
    pub fn uses_draft_cache(&self) -> bool {
        !matches!(self, Self::Edit)
    }
}

impl fmt::Display for WizardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Edit => write!(f, "edit"),
            Self::Gift => write!(f, "gift"),
        }
    }
}

impl FromStr for WizardMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "edit" => Ok(Self::Edit),
            "gift" => Ok(Self::Gift),
            other => Err(DomainError::parse(format!("Unknown wizard mode: {}", other))),
        }
    }
}

/// One numbered stage of the wizard. Serialized as its index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
    #[default]
    BasicInfo = 0,
    Personality = 1,
    Family = 2,
    Pets = 3,
    Toys = 4,
    Worlds = 5,
    Review = 6,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        Self::BasicInfo,
        Self::Personality,
        Self::Family,
        Self::Pets,
        Self::Toys,
        Self::Worlds,
        Self::Review,
    ];

    pub const FIRST: WizardStep = WizardStep::BasicInfo;
    pub const LAST: WizardStep = WizardStep::Review;

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Result<Self, DomainError> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| DomainError::invalid_step_transition(format!("No step {}", index)))
    }

    pub fn is_terminal(self) -> bool {
        self == Self::LAST
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::BasicInfo => "About your child",
            Self::Personality => "Personality",
            Self::Family => "Family",
            Self::Pets => "Pets",
            Self::Toys => "Comforting objects",
            Self::Worlds => "Favorite worlds",
            Self::Review => "Review",
        }
    }

    fn linear_next(self) -> Option<Self> {
        Self::from_index(self.index() + 1).ok()
    }

    fn linear_previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(|i| Self::from_index(i).ok())
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.index()
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.index(), self.title())
    }
}

/// Forward moves that differ from the linear order, as `(mode, from, to)`.
///
/// Backward moves use the same rows reversed. Edit sessions reuse the family
/// and pets already attached to the child through dedicated editors, so they
/// jump over those steps.
const SKIPS: &[(WizardMode, WizardStep, WizardStep)] = &[(
    WizardMode::Edit,
    WizardStep::Personality,
    WizardStep::Toys,
)];

/// Step reached by "next" from `from`; `None` on the terminal step.
pub fn next_step(mode: WizardMode, from: WizardStep) -> Option<WizardStep> {
    SKIPS
        .iter()
        .find(|(m, f, _)| *m == mode && *f == from)
        .map(|(_, _, to)| *to)
        .or_else(|| from.linear_next())
}

/// Step reached by "previous" from `from`; `None` on the first step.
pub fn previous_step(mode: WizardMode, from: WizardStep) -> Option<WizardStep> {
    SKIPS
        .iter()
        .find(|(m, _, to)| *m == mode && *to == from)
        .map(|(_, f, _)| *f)
        .or_else(|| from.linear_previous())
}

/// Steps visited by walking "next" from the first step in `mode`.
pub fn step_path(mode: WizardMode) -> Vec<WizardStep> {
    let mut path = vec![WizardStep::FIRST];
    while let Some(next) = path.last().and_then(|s| next_step(mode, *s)) {
        path.push(next);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [WizardMode; 3] = [WizardMode::Create, WizardMode::Edit, WizardMode::Gift];

    #[test]
    fn create_and_gift_walk_every_step() {
        assert_eq!(step_path(WizardMode::Create), WizardStep::ALL.to_vec());
        assert_eq!(step_path(WizardMode::Gift), WizardStep::ALL.to_vec());
    }

    #[test]
    fn edit_skips_family_and_pets() {
        assert_eq!(
            step_path(WizardMode::Edit),
            vec![
                WizardStep::BasicInfo,
                WizardStep::Personality,
                WizardStep::Toys,
                WizardStep::Worlds,
                WizardStep::Review,
            ]
        );
        assert_eq!(
            next_step(WizardMode::Edit, WizardStep::Personality),
            Some(WizardStep::Toys)
        );
        assert_eq!(
            previous_step(WizardMode::Edit, WizardStep::Toys),
            Some(WizardStep::Personality)
        );
    }

    #[test]
    fn previous_inverts_next_on_every_reachable_step() {
        for mode in MODES {
            for step in step_path(mode) {
                if let Some(next) = next_step(mode, step) {
                    assert_eq!(previous_step(mode, next), Some(step), "{mode} {step}");
                }
            }
        }
    }

    #[test]
    fn edges_are_terminal() {
        for mode in MODES {
            assert_eq!(next_step(mode, WizardStep::Review), None);
            assert_eq!(previous_step(mode, WizardStep::BasicInfo), None);
        }
    }

    #[test]
    fn steps_serialize_as_indices() {
        let json = serde_json::to_string(&WizardStep::Toys).expect("serialize");
        assert_eq!(json, "4");
        let step: WizardStep = serde_json::from_str("6").expect("deserialize");
        assert_eq!(step, WizardStep::Review);
        assert!(serde_json::from_str::<WizardStep>("7").is_err());
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("GIFT".parse::<WizardMode>(), Ok(WizardMode::Gift));
        assert!("draft".parse::<WizardMode>().is_err());
        assert!(!WizardMode::Edit.uses_draft_cache());
    }
}
