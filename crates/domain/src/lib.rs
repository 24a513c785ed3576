extern crate self as storykin_domain;

pub mod catalog;
pub mod common;
pub mod draft;
pub mod error;
pub mod ids;
pub mod selection;
pub mod wizard;

pub use catalog::{Catalog, CatalogEntry};
pub use error::DomainError;

// Re-export draft model types
pub use draft::{
    AgeBracket, Appearance, BasicInfo, ChildGender, Draft, FamilyDraft, Gender, HeightBracket,
    HeightForAge, Personality, Pet, PetType, PetsDraft, PresetOrCustom, Relative, RelativeType,
    Toy, ToyType, ToysDraft, WorldsDraft,
};

// Re-export ID types
pub use ids::{
    ChildId, ComforterId, FamilyId, FamilyMemberId, LocalId, LookupId, PetId, UserId,
};

pub use selection::SelectionCategory;
pub use wizard::{PendingSelections, WizardMode, WizardStep};
