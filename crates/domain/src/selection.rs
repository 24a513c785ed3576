//! Bounded multi-select rules shared by every capped category.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, Catalog};
use crate::error::DomainError;

/// Default cap for the child's preference categories.
pub const DEFAULT_SELECTION_CAP: usize = 3;

/// Preference categories whose selections are resolved against store lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCategory {
    Superpowers,
    Passions,
    Challenges,
    Worlds,
    Discoveries,
}

impl SelectionCategory {
    /// Submission order of the categories.
    pub const ALL: [SelectionCategory; 5] = [
        Self::Superpowers,
        Self::Passions,
        Self::Challenges,
        Self::Worlds,
        Self::Discoveries,
    ];

    pub fn cap(&self) -> usize {
        DEFAULT_SELECTION_CAP
    }

    pub fn catalog(&self) -> Catalog {
        match self {
            Self::Superpowers => catalog::SUPERPOWERS,
            Self::Passions => catalog::PASSIONS,
            Self::Challenges => catalog::CHALLENGES,
            Self::Worlds => catalog::WORLDS,
            Self::Discoveries => catalog::DISCOVERIES,
        }
    }

    /// Token that is exclusive with every other token of the category, if any.
    pub fn sentinel(&self) -> Option<&'static str> {
        match self {
            Self::Discoveries => Some(catalog::NOTHING_TOKEN),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superpowers => "superpowers",
            Self::Passions => "passions",
            Self::Challenges => "challenges",
            Self::Worlds => "worlds",
            Self::Discoveries => "discoveries",
        }
    }
}

impl std::fmt::Display for SelectionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Toggles `token` in `selected`, enforcing the cap and an optional exclusive sentinel.
///
/// Returns `Ok(true)` when the token ended up selected, `Ok(false)` when it was removed.
/// Selecting the sentinel clears every other token; selecting anything else clears the
/// sentinel. A full list rejects new tokens instead of evicting old ones.
pub fn toggle_bounded(
    selected: &mut Vec<String>,
    token: &str,
    cap: usize,
    sentinel: Option<&str>,
    category: &'static str,
) -> Result<bool, DomainError> {
    if let Some(pos) = selected.iter().position(|t| t == token) {
        selected.remove(pos);
        return Ok(false);
    }

    if sentinel == Some(token) {
        selected.clear();
        selected.push(token.to_string());
        return Ok(true);
    }

    if let Some(sentinel) = sentinel {
        selected.retain(|t| t != sentinel);
    }

    if selected.len() >= cap {
        return Err(DomainError::selection_full(category, cap));
    }

    selected.push(token.to_string());
    Ok(true)
}

/// Removes duplicates (keeping first occurrence order) and truncates to `cap`.
pub fn dedup_capped<S: AsRef<str>>(tokens: &[S], cap: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(cap.min(tokens.len()));
    for token in tokens {
        let token = token.as_ref();
        if out.iter().any(|t| t == token) {
            continue;
        }
        if out.len() == cap {
            break;
        }
        out.push(token.to_string());
    }
    out
}

/// Checks a restored or hand-built list against the cap without mutating it.
pub fn check_cap(
    selected: &[String],
    cap: usize,
    category: &'static str,
) -> Result<(), DomainError> {
    if dedup_capped(selected, usize::MAX).len() > cap {
        return Err(DomainError::selection_full(category, cap));
    }
    Ok(())
}
