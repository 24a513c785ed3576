//! Pets authored in the wizard, plus existing pets chosen for association.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::common::StringExt;
use crate::draft::family::{resolve_trait_labels, validate_custom_slots};
use crate::error::DomainError;
use crate::ids::{ChildId, LocalId, PetId};
use crate::selection::toggle_bounded;

pub const MAX_PET_TRAITS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetType {
    Dog,
    Cat,
    Rabbit,
    Hamster,
    Bird,
    Fish,
    Turtle,
    Horse,
    Other,
}

impl PetType {
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
            Self::Rabbit => "rabbit",
            Self::Hamster => "hamster",
            Self::Bird => "bird",
            Self::Fish => "fish",
            Self::Turtle => "turtle",
            Self::Horse => "horse",
            Self::Other => "other",
        }
    }
}

impl FromStr for PetType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "dog" => Self::Dog,
            "cat" => Self::Cat,
            "rabbit" => Self::Rabbit,
            "hamster" => Self::Hamster,
            "bird" => Self::Bird,
            "fish" => Self::Fish,
            "turtle" => Self::Turtle,
            "horse" => Self::Horse,
            "other" => Self::Other,
            other => return Err(DomainError::parse(format!("Unknown pet type: {}", other))),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub local_id: LocalId,
    #[serde(default)]
    pub name: String,
    pub pet_type: PetType,
    #[serde(default)]
    pub custom_type: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub physical_details: Option<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub custom_traits: BTreeMap<String, String>,
}

impl Pet {
    pub fn new(pet_type: PetType, name: impl Into<String>) -> Self {
        Self {
            local_id: LocalId::new(),
            name: name.into(),
            pet_type,
            custom_type: None,
            breed: None,
            physical_details: None,
            traits: Vec::new(),
            custom_traits: BTreeMap::new(),
        }
    }

    /// Type as stored on the pet row: the catalog token, or the user's text for `other`.
    pub fn type_name(&self) -> String {
        match (&self.pet_type, self.custom_type.as_deref()) {
            (PetType::Other, Some(custom)) if !custom.is_blank() => custom.trim().to_string(),
            (t, _) => t.as_token().to_string(),
        }
    }

    pub fn toggle_trait(&mut self, token: &str) -> Result<bool, DomainError> {
        let selected =
            toggle_bounded(&mut self.traits, token, MAX_PET_TRAITS, None, "pet traits")?;
        if !selected {
            self.custom_traits.remove(token);
        }
        Ok(selected)
    }

    pub fn trait_labels(&self) -> Vec<String> {
        resolve_trait_labels(&self.traits, &self.custom_traits, catalog::PET_TRAITS)
    }

    /// Denormalized summary stored on the child/pet join row.
    pub fn trait_summary(&self) -> String {
        self.trait_labels().join(", ")
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.is_blank() {
            return Err(DomainError::validation("Every pet needs a name"));
        }
        if self.pet_type == PetType::Other && self.custom_type.as_deref().map_or(true, |t| t.is_blank()) {
            return Err(DomainError::validation(format!(
                "What kind of animal is {}?",
                self.name.trim()
            )));
        }
        if self.traits.len() > MAX_PET_TRAITS {
            return Err(DomainError::selection_full("pet traits", MAX_PET_TRAITS));
        }
        validate_custom_slots(&self.traits, &self.custom_traits)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetsDraft {
    has_pets: bool,
    pets: Vec<Pet>,
    pub existing_pet_ids: Vec<PetId>,
    /// Draft-local pet id -> other children the pet is also linked to.
    pub pet_child_links: BTreeMap<LocalId, Vec<ChildId>>,
}

impl PetsDraft {
    pub fn has_pets(&self) -> bool {
        self.has_pets
    }

    /// Turning the flag off drops every authored pet, selection and link.
    pub fn set_has_pets(&mut self, has_pets: bool) {
        self.has_pets = has_pets;
        if !has_pets {
            self.pets.clear();
            self.existing_pet_ids.clear();
            self.pet_child_links.clear();
        }
    }

    /// Pets to persist; always empty when the child has no pets.
    pub fn pets(&self) -> &[Pet] {
        if self.has_pets {
            &self.pets
        } else {
            &[]
        }
    }

    pub fn add_pet(&mut self, pet: Pet) -> LocalId {
        self.has_pets = true;
        let id = pet.local_id;
        self.pets.push(pet);
        id
    }

    pub fn pet_mut(&mut self, local_id: LocalId) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|p| p.local_id == local_id)
    }

    pub fn remove_pet(&mut self, local_id: LocalId) -> Option<Pet> {
        let pos = self.pets.iter().position(|p| p.local_id == local_id)?;
        self.pet_child_links.remove(&local_id);
        Some(self.pets.remove(pos))
    }

    pub fn toggle_existing(&mut self, id: PetId) -> bool {
        if let Some(pos) = self.existing_pet_ids.iter().position(|e| *e == id) {
            self.existing_pet_ids.remove(pos);
            false
        } else {
            self.has_pets = true;
            self.existing_pet_ids.push(id);
            true
        }
    }

    /// Existing pets to link; always empty when the child has no pets.
    pub fn existing_ids(&self) -> &[PetId] {
        if self.has_pets {
            &self.existing_pet_ids
        } else {
            &[]
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.pets().iter().try_for_each(Pet::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pets_flag_empties_everything() {
        let mut draft = PetsDraft::default();
        let id = draft.add_pet(Pet::new(PetType::Cat, "Moustache"));
        draft.pet_child_links.insert(id, vec![ChildId::new()]);
        draft.toggle_existing(PetId::new());

        draft.set_has_pets(false);

        assert!(draft.pets().is_empty());
        assert!(draft.existing_ids().is_empty());
        assert!(draft.pet_child_links.is_empty());
    }

    #[test]
    fn restored_pets_are_hidden_while_flag_is_off() {
        let json = serde_json::json!({
            "has_pets": false,
            "pets": [{"local_id": LocalId::new(), "name": "Rex", "pet_type": "dog"}]
        });
        let draft: PetsDraft = serde_json::from_value(json).expect("deserialize");
        assert!(draft.pets().is_empty());
    }

    #[test]
    fn other_type_uses_custom_text() {
        let mut pet = Pet::new(PetType::Other, "Spike");
        assert!(pet.validate().is_err());
        pet.custom_type = Some("Hedgehog".into());
        assert!(pet.validate().is_ok());
        assert_eq!(pet.type_name(), "Hedgehog");
        assert_eq!(Pet::new(PetType::Dog, "Rex").type_name(), "dog");
    }

    #[test]
    fn trait_summary_joins_labels() {
        let mut pet = Pet::new(PetType::Dog, "Rex");
        pet.toggle_trait("playful").expect("first");
        pet.toggle_trait("other1").expect("second");
        pet.custom_traits.insert("other1".into(), "Snores".into());
        assert!(pet.toggle_trait("lazy").is_err());
        assert_eq!(pet.trait_summary(), "Playful, Snores");
    }
}
