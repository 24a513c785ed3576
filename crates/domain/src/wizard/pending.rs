//! Single-choice "type" gestures made before a record is confirmed.

use crate::draft::{PetType, RelativeType, ToyType};
use crate::error::DomainError;

/// Types highlighted in the UI but not yet pushed into the draft.
///
/// Only one type per kind is pending at a time; picking another replaces it.
/// Confirming takes the value out, so a confirmed record never leaves a stale
/// highlight behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSelections {
    relative_type: Option<RelativeType>,
    pet_type: Option<PetType>,
    toy_type: Option<ToyType>,
}

impl PendingSelections {
    pub fn select_relative_type(&mut self, relative_type: RelativeType) {
        self.relative_type = Some(relative_type);
    }

    pub fn select_pet_type(&mut self, pet_type: PetType) {
        self.pet_type = Some(pet_type);
    }

    pub fn select_toy_type(&mut self, toy_type: ToyType) {
        self.toy_type = Some(toy_type);
    }

    pub fn relative_type(&self) -> Option<RelativeType> {
        self.relative_type
    }

    pub fn pet_type(&self) -> Option<PetType> {
        self.pet_type
    }

    pub fn toy_type(&self) -> Option<ToyType> {
        self.toy_type
    }

    pub fn take_relative_type(&mut self) -> Result<RelativeType, DomainError> {
        self.relative_type
            .take()
            .ok_or_else(|| DomainError::validation("Choose who this person is first"))
    }

    pub fn take_pet_type(&mut self) -> Result<PetType, DomainError> {
        self.pet_type
            .take()
            .ok_or_else(|| DomainError::validation("Choose the kind of animal first"))
    }

    pub fn take_toy_type(&mut self) -> Result<ToyType, DomainError> {
        self.toy_type
            .take()
            .ok_or_else(|| DomainError::validation("Choose the kind of object first"))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
