//! Unified error types for the domain layer
//!
//! Every invariant the draft model enforces reports through [`DomainError`],
//! so the engine can surface blocking validation messages without string matching.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., required field missing)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Parse error (unknown catalog token, malformed date)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A bounded selection is already at its cap
    #[error("Selection full for {category}: {max} items allowed")]
    SelectionFull { category: &'static str, max: usize },

    /// Step transition not allowed
    #[error("Invalid step transition: {0}")]
    InvalidStepTransition(String),
}

impl DomainError {
    /// Creates a validation error for required fields and business rules.
    ///
    /// # Example
    /// ```ignore
    /// if first_name.trim().is_empty() {
    ///     return Err(DomainError::validation("First name is required"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a selection-full error
    pub fn selection_full(category: &'static str, max: usize) -> Self {
        Self::SelectionFull { category, max }
    }

    /// Create an invalid step transition error
    pub fn invalid_step_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStepTransition(msg.into())
    }

    /// True for errors the user can fix by editing the current step.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::SelectionFull { .. })
    }
}
