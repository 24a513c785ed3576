//! Personality and favorite-world selections: the capped preference categories.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{is_custom_slot, NOTHING_TOKEN};
use crate::common::StringExt;
use crate::error::DomainError;
use crate::selection::{check_cap, SelectionCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightForAge {
    Smaller,
    Average,
    Taller,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Personality {
    pub superpowers: Vec<String>,
    pub passions: Vec<String>,
    pub challenges: Vec<String>,
    pub height_for_age: Option<HeightForAge>,
}

impl Personality {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.superpowers.is_empty() {
            return Err(DomainError::validation("Pick at least one superpower"));
        }
        check_cap(&self.superpowers, SelectionCategory::Superpowers.cap(), "superpowers")?;
        check_cap(&self.passions, SelectionCategory::Passions.cap(), "passions")?;
        check_cap(&self.challenges, SelectionCategory::Challenges.cap(), "challenges")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldsDraft {
    pub worlds: Vec<String>,
    pub discoveries: Vec<String>,
    /// Free text typed into `other1`/`other2` slots.
    pub custom_values: BTreeMap<String, String>,
}

impl WorldsDraft {
    /// Free-text worlds for selected custom slots, in selection order.
    pub fn custom_worlds(&self) -> Vec<String> {
        self.worlds
            .iter()
            .filter(|t| is_custom_slot(t))
            .filter_map(|t| self.custom_values.get(t).and_then(|v| v.as_str().into_option()))
            .collect()
    }

    /// True when the child explicitly has nothing to discover yet.
    pub fn discovers_nothing(&self) -> bool {
        self.discoveries.iter().any(|d| d == NOTHING_TOKEN)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_cap(&self.worlds, SelectionCategory::Worlds.cap(), "worlds")?;
        check_cap(&self.discoveries, SelectionCategory::Discoveries.cap(), "discoveries")?;
        for slot in self.worlds.iter().filter(|t| is_custom_slot(t)) {
            if self.custom_values.get(slot).map_or(true, |v| v.is_blank()) {
                return Err(DomainError::validation("Tell us about the world you added"));
            }
        }
        Ok(())
    }
}
