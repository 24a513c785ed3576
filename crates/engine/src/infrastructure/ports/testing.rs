//! Testability ports for injecting time and randomness.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date used for age derivation.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub trait RandomPort: Send + Sync {
    fn gen_range(&self, min: i32, max: i32) -> i32;
    fn gen_uuid(&self) -> Uuid;
}
