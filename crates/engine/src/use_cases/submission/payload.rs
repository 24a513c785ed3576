//! Opaque JSON blobs stored alongside the normalized rows.

use chrono::NaiveDate;
use serde::Serialize;
use storykin_domain::common::none_if_blank;
use storykin_domain::{
    AgeBracket, ChildGender, Draft, Gender, HeightBracket, HeightForAge, Pet, PresetOrCustom,
    Relative,
};

use super::error::StepError;

#[derive(Serialize)]
struct ChildDetails<'a> {
    gender: Option<ChildGender>,
    birth_date: Option<NaiveDate>,
    age: Option<AgeBracket>,
    nickname: Option<&'a PresetOrCustom>,
    skin_color: Option<&'a PresetOrCustom>,
    eye_color: Option<&'a PresetOrCustom>,
    hair_color: Option<&'a PresetOrCustom>,
    hair_type: Option<&'a PresetOrCustom>,
    has_glasses: bool,
    height: Option<HeightBracket>,
    height_for_age: Option<HeightForAge>,
    custom_worlds: Vec<String>,
    discovers_nothing: bool,
}

/// Identity and appearance blob for the child profile row.
pub fn child_details(draft: &Draft) -> Result<serde_json::Value, StepError> {
    let info = &draft.basic_info;
    let details = ChildDetails {
        gender: info.gender,
        birth_date: info.birth_date(),
        age: info.age(),
        nickname: info.nickname.as_ref(),
        skin_color: info.skin_color.as_ref(),
        eye_color: info.eye_color.as_ref(),
        hair_color: info.hair_color.as_ref(),
        hair_type: info.hair_type.as_ref(),
        has_glasses: info.has_glasses,
        height: info.height,
        height_for_age: draft.personality.height_for_age,
        custom_worlds: draft.worlds.custom_worlds(),
        discovers_nothing: draft.worlds.discovers_nothing(),
    };
    serde_json::to_value(details).map_err(StepError::serialization)
}

#[derive(Serialize)]
struct RelativePayload<'a> {
    #[serde(flatten)]
    relative: &'a Relative,
    gender: Gender,
    role: String,
    trait_labels: Vec<String>,
}

/// Full relative description stored on the family member row.
pub fn relative_payload(relative: &Relative) -> Result<serde_json::Value, StepError> {
    serde_json::to_value(RelativePayload {
        relative,
        gender: relative.gender(),
        role: relative.role_label(),
        trait_labels: relative.trait_labels(),
    })
    .map_err(StepError::serialization)
}

#[derive(Serialize)]
struct PetDetails {
    physical_details: Option<String>,
    traits: Vec<String>,
}

pub fn pet_details(pet: &Pet) -> Result<serde_json::Value, StepError> {
    serde_json::to_value(PetDetails {
        physical_details: pet.physical_details.as_deref().and_then(none_if_blank),
        traits: pet.trait_labels(),
    })
    .map_err(StepError::serialization)
}
