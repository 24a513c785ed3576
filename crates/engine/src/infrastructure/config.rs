//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::infrastructure::storage::default_storage_path;

pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 1500;
pub const DEFAULT_DRAFT_KEY: &str = "storykin_child_wizard_draft";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Quiet period before a draft edit is written to storage.
    pub autosave_debounce: Duration,
    /// Pause between the success notification and navigation.
    pub redirect_delay: Duration,
    pub draft_key: String,
    pub autosave_enabled: bool,
    pub storage_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            autosave_debounce: Duration::from_millis(DEFAULT_AUTOSAVE_DEBOUNCE_MS),
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
            draft_key: DEFAULT_DRAFT_KEY.to_string(),
            autosave_enabled: true,
            storage_path: default_storage_path(),
        }
    }
}

impl AppConfig {
    /// Reads `STORYKIN_*` variables, falling back to defaults for missing or malformed values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| match v.trim().parse::<u64>() {
                    Ok(ms) => Some(Duration::from_millis(ms)),
                    Err(e) => {
                        tracing::warn!(key, value = %v, error = %e, "Ignoring invalid duration");
                        None
                    }
                })
                .unwrap_or(default)
        };

        let autosave_enabled = lookup("STORYKIN_AUTOSAVE_ENABLED")
            .map(|v| parse_flag(&v))
            .unwrap_or(defaults.autosave_enabled);

        Self {
            autosave_debounce: millis("STORYKIN_AUTOSAVE_DEBOUNCE_MS", defaults.autosave_debounce),
            redirect_delay: millis("STORYKIN_REDIRECT_DELAY_MS", defaults.redirect_delay),
            draft_key: lookup("STORYKIN_DRAFT_KEY")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.draft_key),
            autosave_enabled,
            storage_path: lookup("STORYKIN_STORAGE_PATH")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
