//! Relatives authored during the wizard and associations with existing ones.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, is_custom_slot};
use crate::common::{lenient_date, StringExt};
use crate::draft::basic_info::PresetOrCustom;
use crate::error::DomainError;
use crate::ids::{ChildId, FamilyMemberId, LocalId};
use crate::selection::toggle_bounded;

/// Maximum number of character traits per relative.
pub const MAX_RELATIVE_TRAITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelativeType {
    Mother,
    Father,
    Sister,
    Brother,
    Grandmother,
    Grandfather,
    FemaleCousin,
    MaleCousin,
    FemaleFriend,
    MaleFriend,
    OtherParent,
    Other,
}

impl RelativeType {
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Mother => "mother",
            Self::Father => "father",
            Self::Sister => "sister",
            Self::Brother => "brother",
            Self::Grandmother => "grandmother",
            Self::Grandfather => "grandfather",
            Self::FemaleCousin => "femaleCousin",
            Self::MaleCousin => "maleCousin",
            Self::FemaleFriend => "femaleFriend",
            Self::MaleFriend => "maleFriend",
            Self::OtherParent => "otherParent",
            Self::Other => "other",
        }
    }

    /// Gender implied by the relationship, used unless the user overrides it.
    pub fn default_gender(&self) -> Gender {
        match self {
            Self::Mother
            | Self::Sister
            | Self::Grandmother
            | Self::FemaleCousin
            | Self::FemaleFriend => Gender::Female,
            Self::Father
            | Self::Brother
            | Self::Grandfather
            | Self::MaleCousin
            | Self::MaleFriend => Gender::Male,
            Self::OtherParent | Self::Other => Gender::Neutral,
        }
    }

    pub fn label(&self) -> &'static str {
        catalog::RELATIVE_TYPES
            .label_for(self.as_token())
            .unwrap_or("Relative")
    }
}

impl FromStr for RelativeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "mother" => Self::Mother,
            "father" => Self::Father,
            "sister" => Self::Sister,
            "brother" => Self::Brother,
            "grandmother" => Self::Grandmother,
            "grandfather" => Self::Grandfather,
            "femaleCousin" => Self::FemaleCousin,
            "maleCousin" => Self::MaleCousin,
            "femaleFriend" => Self::FemaleFriend,
            "maleFriend" => Self::MaleFriend,
            "otherParent" => Self::OtherParent,
            "other" => Self::Other,
            other => return Err(DomainError::parse(format!("Unknown relative type: {}", other))),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    Neutral,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    pub skin_color: Option<PresetOrCustom>,
    pub hair_color: Option<PresetOrCustom>,
    pub hair_type: Option<PresetOrCustom>,
    pub has_glasses: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relative {
    pub local_id: LocalId,
    pub relative_type: RelativeType,
    #[serde(default)]
    pub custom_type_label: Option<String>,
    #[serde(default)]
    pub gender_override: Option<Gender>,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub custom_traits: BTreeMap<String, String>,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default, with = "lenient_date")]
    pub birth_date: Option<NaiveDate>,
}

impl Relative {
    pub fn new(relative_type: RelativeType) -> Self {
        Self {
            local_id: LocalId::new(),
            relative_type,
            custom_type_label: None,
            gender_override: None,
            nickname: String::new(),
            appearance: Appearance::default(),
            traits: Vec::new(),
            custom_traits: BTreeMap::new(),
            job: None,
            age: None,
            birth_date: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }

    pub fn gender(&self) -> Gender {
        self.gender_override
            .unwrap_or_else(|| self.relative_type.default_gender())
    }

    /// Role shown to the user and stored on the family member row.
    pub fn role_label(&self) -> String {
        match (&self.relative_type, &self.custom_type_label) {
            (RelativeType::Other, Some(label)) if !label.is_blank() => label.trim().to_string(),
            (t, _) => t.label().to_string(),
        }
    }

    pub fn toggle_trait(&mut self, token: &str) -> Result<bool, DomainError> {
        let selected = toggle_bounded(
            &mut self.traits,
            token,
            MAX_RELATIVE_TRAITS,
            None,
            "relative traits",
        )?;
        if !selected {
            self.custom_traits.remove(token);
        }
        Ok(selected)
    }

    /// Trait labels, with custom slot tokens replaced by the user's text.
    pub fn trait_labels(&self) -> Vec<String> {
        resolve_trait_labels(&self.traits, &self.custom_traits, catalog::CHARACTER_TRAITS)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.nickname.is_blank() {
            return Err(DomainError::validation(format!(
                "Give a name to the {}",
                self.relative_type.label().to_lowercase()
            )));
        }
        if self.relative_type == RelativeType::Other
            && self.custom_type_label.as_deref().map_or(true, |l| l.is_blank())
        {
            return Err(DomainError::validation(format!(
                "Describe who {} is",
                self.nickname.trim()
            )));
        }
        if self.traits.len() > MAX_RELATIVE_TRAITS {
            return Err(DomainError::selection_full("relative traits", MAX_RELATIVE_TRAITS));
        }
        validate_custom_slots(&self.traits, &self.custom_traits)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyDraft {
    pub relatives: Vec<Relative>,
    pub existing_relative_ids: Vec<FamilyMemberId>,
    /// Draft-local relative id -> sibling children the relative is also linked to.
    pub relative_child_links: BTreeMap<LocalId, Vec<ChildId>>,
}

impl FamilyDraft {
    pub fn relative(&self, local_id: LocalId) -> Option<&Relative> {
        self.relatives.iter().find(|r| r.local_id == local_id)
    }

    pub fn relative_mut(&mut self, local_id: LocalId) -> Option<&mut Relative> {
        self.relatives.iter_mut().find(|r| r.local_id == local_id)
    }

    /// Removes a relative and any cross-child links that pointed at it.
    pub fn remove_relative(&mut self, local_id: LocalId) -> Option<Relative> {
        let pos = self.relatives.iter().position(|r| r.local_id == local_id)?;
        self.relative_child_links.remove(&local_id);
        Some(self.relatives.remove(pos))
    }

    pub fn toggle_existing(&mut self, id: FamilyMemberId) -> bool {
        if let Some(pos) = self.existing_relative_ids.iter().position(|e| *e == id) {
            self.existing_relative_ids.remove(pos);
            false
        } else {
            self.existing_relative_ids.push(id);
            true
        }
    }
}

/// Maps trait tokens to labels; custom slots use the user's text and are skipped when blank.
pub(crate) fn resolve_trait_labels(
    tokens: &[String],
    custom: &BTreeMap<String, String>,
    catalog: catalog::Catalog,
) -> Vec<String> {
    tokens
        .iter()
        .filter_map(|token| {
            if is_custom_slot(token) {
                custom.get(token).and_then(|t| t.as_str().into_option())
            } else {
                catalog.label_for(token).map(str::to_string)
            }
        })
        .collect()
}

pub(crate) fn validate_custom_slots(
    tokens: &[String],
    custom: &BTreeMap<String, String>,
) -> Result<(), DomainError> {
    for token in tokens.iter().filter(|t| is_custom_slot(t)) {
        if custom.get(token).map_or(true, |t| t.is_blank()) {
            return Err(DomainError::validation(format!(
                "Fill in the custom value for '{}'",
                token
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_is_derived_from_type_unless_overridden() {
        let mut r = Relative::new(RelativeType::Grandmother);
        assert_eq!(r.gender(), Gender::Female);
        r.gender_override = Some(Gender::Neutral);
        assert_eq!(r.gender(), Gender::Neutral);
        assert_eq!(Relative::new(RelativeType::Other).gender(), Gender::Neutral);
    }

    #[test]
    fn type_tokens_round_trip() {
        for token in catalog::RELATIVE_TYPES.entries.iter().map(|e| e.value) {
            let t: RelativeType = token.parse().expect("catalog token");
            assert_eq!(t.as_token(), token);
        }
    }

    #[test]
    fn traits_are_capped_and_custom_text_resolves() {
        let mut r = Relative::new(RelativeType::Father).with_nickname("Papa");
        for t in ["funny", "wise", "other1"] {
            r.toggle_trait(t).expect("under cap");
        }
        assert!(r.toggle_trait("gentle").is_err());
        r.custom_traits.insert("other1".into(), "Great cook".into());
        assert_eq!(r.trait_labels(), vec!["Funny", "Wise", "Great cook"]);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn untoggling_a_custom_slot_drops_its_text() {
        let mut r = Relative::new(RelativeType::Sister).with_nickname("Zoe");
        r.toggle_trait("other2").expect("select");
        r.custom_traits.insert("other2".into(), "Loud".into());
        r.toggle_trait("other2").expect("deselect");
        assert!(r.custom_traits.is_empty());
    }

    #[test]
    fn other_type_needs_a_label() {
        let mut r = Relative::new(RelativeType::Other).with_nickname("Nounou");
        assert!(r.validate().is_err());
        r.custom_type_label = Some("Nanny".into());
        assert!(r.validate().is_ok());
        assert_eq!(r.role_label(), "Nanny");
    }

    #[test]
    fn blank_custom_trait_fails_validation() {
        let mut r = Relative::new(RelativeType::Mother).with_nickname("Mum");
        r.toggle_trait("other1").expect("select");
        assert!(r.validate().is_err());
    }

    #[test]
    fn removing_relative_drops_its_links() {
        let mut family = FamilyDraft::default();
        let r = Relative::new(RelativeType::Brother).with_nickname("Tom");
        let id = r.local_id;
        family.relatives.push(r);
        family.relative_child_links.insert(id, vec![ChildId::new()]);
        assert!(family.remove_relative(id).is_some());
        assert!(family.relative_child_links.is_empty());
    }
}
