//! Records exchanged with the relational store.
//!
//! `New*` structs are insert payloads; `*Record` structs are rows read back
//! with their store-assigned ids.

use serde::{Deserialize, Serialize};
use storykin_domain::{
    ChildId, ComforterId, FamilyId, FamilyMemberId, LookupId, PetId, SelectionCategory, UserId,
};

// =============================================================================
// Family
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyRecord {
    pub id: FamilyId,
    pub name: String,
    pub owner: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFamilyMember {
    pub family_id: FamilyId,
    pub name: String,
    pub role: String,
    /// Full relative description, stored opaquely.
    pub payload: serde_json::Value,
    pub created_by: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMemberRecord {
    pub id: FamilyMemberId,
    pub family_id: FamilyId,
    pub name: String,
    pub role: String,
    pub payload: serde_json::Value,
}

// =============================================================================
// Child profile
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChildProfile {
    pub family_id: FamilyId,
    pub first_name: String,
    /// Identity and appearance blob.
    pub details: serde_json::Value,
    pub has_pets: bool,
    pub created_by: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfileRecord {
    pub id: ChildId,
    pub family_id: FamilyId,
    pub first_name: String,
    pub details: serde_json::Value,
    pub has_pets: bool,
}

/// Fields rewritten when an existing child profile is edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfileUpdate {
    pub first_name: String,
    pub details: serde_json::Value,
    pub has_pets: bool,
}

// =============================================================================
// Pets and comforters
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPet {
    pub family_id: FamilyId,
    pub name: String,
    pub pet_type: String,
    pub breed: Option<String>,
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetRecord {
    pub id: PetId,
    pub family_id: FamilyId,
    pub name: String,
    pub pet_type: String,
    pub breed: Option<String>,
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComforter {
    pub label: String,
    /// Emoji for the object type.
    pub type_tag: String,
    pub is_active: bool,
    pub created_by: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComforterRecord {
    pub id: ComforterId,
    pub label: String,
    pub type_tag: String,
    pub is_active: bool,
    pub created_by: UserId,
}

// =============================================================================
// Lookup tables and join rows
// =============================================================================

/// Label lookup tables, one per bounded preference category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LookupTable {
    Superpowers,
    Likes,
    Challenges,
    Universes,
    Discoveries,
}

impl LookupTable {
    pub const ALL: [LookupTable; 5] = [
        Self::Superpowers,
        Self::Likes,
        Self::Challenges,
        Self::Universes,
        Self::Discoveries,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Superpowers => "superpowers",
            Self::Likes => "likes",
            Self::Challenges => "challenges",
            Self::Universes => "universes",
            Self::Discoveries => "discoveries",
        }
    }

    /// Join table linking a child to rows of this lookup table.
    pub fn link_table_name(&self) -> &'static str {
        match self {
            Self::Superpowers => "child_superpowers",
            Self::Likes => "child_likes",
            Self::Challenges => "child_challenges",
            Self::Universes => "child_universes",
            Self::Discoveries => "child_discoveries",
        }
    }

    pub fn category(&self) -> SelectionCategory {
        match self {
            Self::Superpowers => SelectionCategory::Superpowers,
            Self::Likes => SelectionCategory::Passions,
            Self::Challenges => SelectionCategory::Challenges,
            Self::Universes => SelectionCategory::Worlds,
            Self::Discoveries => SelectionCategory::Discoveries,
        }
    }
}

impl From<SelectionCategory> for LookupTable {
    fn from(category: SelectionCategory) -> Self {
        match category {
            SelectionCategory::Superpowers => Self::Superpowers,
            SelectionCategory::Passions => Self::Likes,
            SelectionCategory::Challenges => Self::Challenges,
            SelectionCategory::Worlds => Self::Universes,
            SelectionCategory::Discoveries => Self::Discoveries,
        }
    }
}

impl std::fmt::Display for LookupTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRow {
    pub id: LookupId,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildFamilyMemberLink {
    pub child_id: ChildId,
    pub family_member_id: FamilyMemberId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildPetLink {
    pub child_id: ChildId,
    pub pet_id: PetId,
    pub display_name: String,
    pub trait_summary: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildComforterLink {
    pub child_id: ChildId,
    pub comforter_id: ComforterId,
}
