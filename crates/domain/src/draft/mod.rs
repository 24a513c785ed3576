//! The Draft: the single nested value edited across the wizard.
//!
//! Everything the wizard collects lives here and nowhere else. Transient UI
//! gestures (which relative type is highlighted before it is confirmed) live in
//! [`crate::wizard::PendingSelections`] and are merged in on confirm.

pub mod basic_info;
pub mod family;
pub mod pets;
pub mod preferences;
pub mod toys;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::ChildId;
use crate::selection::{toggle_bounded, SelectionCategory};
use crate::wizard::{validate_step, WizardMode, WizardStep};

pub use basic_info::{AgeBracket, BasicInfo, ChildGender, HeightBracket, PresetOrCustom};
pub use family::{Appearance, FamilyDraft, Gender, Relative, RelativeType};
pub use pets::{Pet, PetType, PetsDraft};
pub use preferences::{HeightForAge, Personality, WorldsDraft};
pub use toys::{Toy, ToyType, ToysDraft};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub step: WizardStep,
    pub mode: WizardMode,
    /// Child being edited; only set for drafts hydrated from an existing profile.
    pub editing_child_id: Option<ChildId>,
    pub basic_info: BasicInfo,
    pub personality: Personality,
    pub family: FamilyDraft,
    pub pets: PetsDraft,
    pub toys: ToysDraft,
    pub worlds: WorldsDraft,
}

impl Draft {
    pub fn new(mode: WizardMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Draft for editing an existing child profile.
    pub fn for_edit(child_id: ChildId) -> Self {
        Self {
            mode: WizardMode::Edit,
            editing_child_id: Some(child_id),
            ..Default::default()
        }
    }

    pub fn selections(&self, category: SelectionCategory) -> &[String] {
        match category {
            SelectionCategory::Superpowers => &self.personality.superpowers,
            SelectionCategory::Passions => &self.personality.passions,
            SelectionCategory::Challenges => &self.personality.challenges,
            SelectionCategory::Worlds => &self.worlds.worlds,
            SelectionCategory::Discoveries => &self.worlds.discoveries,
        }
    }

    fn selections_mut(&mut self, category: SelectionCategory) -> &mut Vec<String> {
        match category {
            SelectionCategory::Superpowers => &mut self.personality.superpowers,
            SelectionCategory::Passions => &mut self.personality.passions,
            SelectionCategory::Challenges => &mut self.personality.challenges,
            SelectionCategory::Worlds => &mut self.worlds.worlds,
            SelectionCategory::Discoveries => &mut self.worlds.discoveries,
        }
    }

    /// Toggles a catalog token in a capped category.
    ///
    /// # Errors
    ///
    /// - `DomainError::Parse` for tokens missing from the category's catalog
    /// - `DomainError::SelectionFull` when the category is already at its cap
    pub fn toggle_selection(
        &mut self,
        category: SelectionCategory,
        token: &str,
    ) -> Result<bool, DomainError> {
        if !category.catalog().contains(token) {
            return Err(DomainError::parse(format!(
                "'{}' is not a {} option",
                token, category
            )));
        }
        let selected = toggle_bounded(
            self.selections_mut(category),
            token,
            category.cap(),
            category.sentinel(),
            category.as_str(),
        )?;
        if !selected && category == SelectionCategory::Worlds {
            self.worlds.custom_values.remove(token);
        }
        Ok(selected)
    }

    pub fn set_birth_date(
        &mut self,
        birth_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<(), DomainError> {
        self.basic_info.set_birth_date(birth_date, today)
    }

    pub fn validate_step(&self, step: WizardStep, today: NaiveDate) -> Result<(), DomainError> {
        validate_step(self, step, today)
    }

    /// Validates every step the draft's mode walks through.
    pub fn validate_all(&self, today: NaiveDate) -> Result<(), DomainError> {
        crate::wizard::step_path(self.mode)
            .into_iter()
            .try_for_each(|step| validate_step(self, step, today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_rejects_foreign_tokens() {
        let mut draft = Draft::new(WizardMode::Create);
        let err = draft
            .toggle_selection(SelectionCategory::Superpowers, "ocean")
            .expect_err("expected an error");
        assert!(matches!(err, DomainError::Parse(_)));
    }

    #[test]
    fn toggle_enforces_cap_per_category() {
        let mut draft = Draft::new(WizardMode::Create);
        for token in ["kindness", "courage", "humor"] {
            draft
                .toggle_selection(SelectionCategory::Superpowers, token)
                .expect("under cap");
        }
        assert!(draft
            .toggle_selection(SelectionCategory::Superpowers, "patience")
            .is_err());
        // Other categories are unaffected
        draft
            .toggle_selection(SelectionCategory::Passions, "music")
            .expect("separate cap");
        assert_eq!(draft.selections(SelectionCategory::Superpowers).len(), 3);
    }

    #[test]
    fn deselecting_custom_world_drops_text() {
        let mut draft = Draft::new(WizardMode::Create);
        draft
            .toggle_selection(SelectionCategory::Worlds, "other1")
            .expect("select");
        draft
            .worlds
            .custom_values
            .insert("other1".into(), "Cloud city".into());
        draft
            .toggle_selection(SelectionCategory::Worlds, "other1")
            .expect("deselect");
        assert!(draft.worlds.custom_values.is_empty());
    }

    #[test]
    fn nothing_discovery_is_exclusive() {
        let mut draft = Draft::new(WizardMode::Gift);
        draft
            .toggle_selection(SelectionCategory::Discoveries, "history")
            .expect("select");
        draft
            .toggle_selection(SelectionCategory::Discoveries, "nothing")
            .expect("nothing");
        assert_eq!(draft.selections(SelectionCategory::Discoveries), ["nothing"]);
        assert!(draft.worlds.discovers_nothing());
    }

    #[test]
    fn edit_draft_carries_child_id() {
        let id = ChildId::new();
        let draft = Draft::for_edit(id);
        assert_eq!(draft.mode, WizardMode::Edit);
        assert_eq!(draft.editing_child_id, Some(id));
    }
}
