//! Comforting objects (toys) authored in the wizard.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{self, NO_SPECIFIC_ROLE};
use crate::common::StringExt;
use crate::error::DomainError;
use crate::ids::{ComforterId, LocalId};
use crate::selection::toggle_bounded;

pub const MAX_TOY_ROLES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToyType {
    Plush,
    Doll,
    Blanket,
    Figurine,
    Vehicle,
    Other,
}

impl ToyType {
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Plush => "plush",
            Self::Doll => "doll",
            Self::Blanket => "blanket",
            Self::Figurine => "figurine",
            Self::Vehicle => "vehicle",
            Self::Other => "other",
        }
    }

    /// Emoji tag stored on the comforter row.
    pub fn icon(&self) -> &'static str {
        catalog::TOY_TYPES.icon_for(self.as_token()).unwrap_or("🎈")
    }
}

impl FromStr for ToyType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "plush" => Self::Plush,
            "doll" => Self::Doll,
            "blanket" => Self::Blanket,
            "figurine" => Self::Figurine,
            "vehicle" => Self::Vehicle,
            "other" => Self::Other,
            other => return Err(DomainError::parse(format!("Unknown toy type: {}", other))),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toy {
    pub local_id: LocalId,
    #[serde(default)]
    pub name: String,
    pub toy_type: ToyType,
    #[serde(default)]
    pub custom_type: Option<String>,
    #[serde(default)]
    pub appearance: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
    /// Set when the toy was loaded from an existing comforter row.
    #[serde(default)]
    pub comforter_id: Option<ComforterId>,
}

impl Toy {
    pub fn new(toy_type: ToyType, name: impl Into<String>) -> Self {
        Self {
            local_id: LocalId::new(),
            name: name.into(),
            toy_type,
            custom_type: None,
            appearance: None,
            roles: Vec::new(),
            comforter_id: None,
        }
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Toggles a role. "No specific role" replaces every other role, and picking
    /// any other role drops "no specific role".
    pub fn toggle_role(&mut self, role: &str) -> Result<bool, DomainError> {
        if !catalog::TOY_ROLES.contains(role) {
            return Err(DomainError::parse(format!("Unknown toy role: {}", role)));
        }
        toggle_bounded(
            &mut self.roles,
            role,
            MAX_TOY_ROLES,
            Some(NO_SPECIFIC_ROLE),
            "toy roles",
        )
    }

    pub fn has_specific_role(&self) -> bool {
        self.roles.iter().any(|r| r != NO_SPECIFIC_ROLE)
    }

    /// Label stored on the comforter row.
    pub fn display_label(&self) -> String {
        self.name.trim().to_string()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.is_blank() {
            return Err(DomainError::validation("Every comforting object needs a name"));
        }
        if self.toy_type == ToyType::Other && self.custom_type.as_deref().map_or(true, |t| t.is_blank()) {
            return Err(DomainError::validation(format!(
                "What kind of object is {}?",
                self.name.trim()
            )));
        }
        if self.roles.len() > MAX_TOY_ROLES {
            return Err(DomainError::selection_full("toy roles", MAX_TOY_ROLES));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToysDraft {
    has_toys: bool,
    toys: Vec<Toy>,
}

impl ToysDraft {
    pub fn has_toys(&self) -> bool {
        self.has_toys
    }

    pub fn set_has_toys(&mut self, has_toys: bool) {
        self.has_toys = has_toys;
        if !has_toys {
            self.toys.clear();
        }
    }

    /// Toys to persist; always empty when the child has none.
    pub fn toys(&self) -> &[Toy] {
        if self.has_toys {
            &self.toys
        } else {
            &[]
        }
    }

    pub fn add_toy(&mut self, toy: Toy) -> LocalId {
        self.has_toys = true;
        let id = toy.local_id;
        self.toys.push(toy);
        id
    }

    pub fn toy_mut(&mut self, local_id: LocalId) -> Option<&mut Toy> {
        self.toys.iter_mut().find(|t| t.local_id == local_id)
    }

    pub fn remove_toy(&mut self, local_id: LocalId) -> Option<Toy> {
        let pos = self.toys.iter().position(|t| t.local_id == local_id)?;
        Some(self.toys.remove(pos))
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.toys().iter().try_for_each(Toy::validate)
    }
}
