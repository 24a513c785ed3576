//! Per-step validation run before the wizard advances.

use chrono::NaiveDate;

use crate::common::StringExt;
use crate::draft::Draft;
use crate::error::DomainError;
use crate::wizard::WizardStep;

const MAX_FIRST_NAME_LENGTH: usize = 50;

/// Checks the part of the draft that `step` collects.
///
/// The review step has nothing of its own to check.
pub fn validate_step(draft: &Draft, step: WizardStep, today: NaiveDate) -> Result<(), DomainError> {
    match step {
        WizardStep::BasicInfo => validate_basic_info(draft, today),
        WizardStep::Personality => draft.personality.validate(),
        WizardStep::Family => draft
            .family
            .relatives
            .iter()
            .try_for_each(|r| r.validate()),
        WizardStep::Pets => draft.pets.validate(),
        WizardStep::Toys => draft.toys.validate(),
        WizardStep::Worlds => draft.worlds.validate(),
        WizardStep::Review => Ok(()),
    }
}

fn validate_basic_info(draft: &Draft, today: NaiveDate) -> Result<(), DomainError> {
    let info = &draft.basic_info;
    if info.first_name.is_blank() {
        return Err(DomainError::validation("First name is required"));
    }
    if info.first_name.trim().chars().count() > MAX_FIRST_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "First name cannot exceed {} characters",
            MAX_FIRST_NAME_LENGTH
        )));
    }
    if info.gender.is_none() {
        return Err(DomainError::validation("Gender is required"));
    }
    match info.birth_date() {
        None => Err(DomainError::validation("Birth date is required")),
        Some(date) if date > today => {
            Err(DomainError::validation("Birth date cannot be in the future"))
        }
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{ChildGender, Pet, PetType, Relative, RelativeType};
    use crate::wizard::WizardMode;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")
    }

    fn filled_basic_info() -> Draft {
        let mut draft = Draft::new(WizardMode::Create);
        draft.basic_info.first_name = "Léa".into();
        draft.basic_info.gender = Some(ChildGender::Girl);
        draft
            .set_birth_date(NaiveDate::from_ymd_opt(2020, 9, 12), today())
            .expect("past date");
        draft
    }

    #[test]
    fn basic_info_requires_name_gender_and_birth_date() {
        let mut draft = Draft::new(WizardMode::Create);
        assert!(validate_step(&draft, WizardStep::BasicInfo, today()).is_err());
        draft.basic_info.first_name = "  ".into();
        assert!(validate_step(&draft, WizardStep::BasicInfo, today()).is_err());

        let draft = filled_basic_info();
        assert!(validate_step(&draft, WizardStep::BasicInfo, today()).is_ok());
    }

    #[test]
    fn overly_long_first_name_is_rejected() {
        let mut draft = filled_basic_info();
        draft.basic_info.first_name = "x".repeat(51);
        assert!(validate_step(&draft, WizardStep::BasicInfo, today()).is_err());
    }

    #[test]
    fn family_step_checks_each_relative() {
        let mut draft = filled_basic_info();
        draft.family.relatives.push(Relative::new(RelativeType::Mother));
        assert!(validate_step(&draft, WizardStep::Family, today()).is_err());
        draft.family.relatives[0].nickname = "Maman".into();
        assert!(validate_step(&draft, WizardStep::Family, today()).is_ok());
    }

    #[test]
    fn pets_step_ignores_pets_when_flag_is_off() {
        let mut draft = filled_basic_info();
        draft.pets.add_pet(Pet::new(PetType::Dog, ""));
        assert!(validate_step(&draft, WizardStep::Pets, today()).is_err());
        draft.pets.set_has_pets(false);
        assert!(validate_step(&draft, WizardStep::Pets, today()).is_ok());
    }

    #[test]
    fn review_is_always_valid() {
        let draft = Draft::new(WizardMode::Create);
        assert!(validate_step(&draft, WizardStep::Review, today()).is_ok());
    }
}
