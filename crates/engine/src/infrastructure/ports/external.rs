//! Client-facing ports: session, local storage, notifications and navigation.

use serde::{Deserialize, Serialize};
use storykin_domain::UserId;

use super::error::StorageError;

// =============================================================================
// Session
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait SessionPort: Send + Sync {
    fn current_user_id(&self) -> Option<UserId>;
}

// =============================================================================
// Key/value storage
// =============================================================================

/// Synchronous string storage for the draft cache.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Fire-and-forget user notifications.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationPort: Send + Sync {
    fn notify(&self, notification: Notification);
}

// =============================================================================
// Navigation
// =============================================================================

/// Where the user lands after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Gift flow continues with the purchase step.
    GiftNextStep,
    /// Profile is ready for the first story.
    ReadyToStart,
}

#[cfg_attr(test, mockall::automock)]
pub trait NavigatorPort: Send + Sync {
    fn navigate(&self, destination: Destination);
}
