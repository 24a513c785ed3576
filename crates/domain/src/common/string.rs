//! String conversion utilities.

/// Trims a string and converts a blank result to `None`.
///
/// Free-text draft fields arrive untrimmed from form inputs; persisted rows
/// store `None` rather than whitespace.
///
/// # Examples
///
/// ```
/// use storykin_domain::common::none_if_blank;
///
/// assert_eq!(none_if_blank("  Lulu "), Some("Lulu".to_string()));
/// assert_eq!(none_if_blank("   "), None);
/// ```
pub fn none_if_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Extension trait for strings providing `into_option` as a method.
pub trait StringExt {
    /// Converts this string to `None` if blank, otherwise `Some(trimmed)`.
    fn into_option(self) -> Option<String>;

    /// True when the string is empty after trimming.
    fn is_blank(&self) -> bool;
}

impl StringExt for String {
    fn into_option(self) -> Option<String> {
        none_if_blank(&self)
    }

    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl StringExt for &str {
    fn into_option(self) -> Option<String> {
        none_if_blank(self)
    }

    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}
