//! Common utility functions shared across the domain and engine.
//!
//! Pure functions only - no side effects, no I/O.

pub mod datetime;
pub mod string;

pub use datetime::{lenient_date, parse_date_lenient};
pub use string::{none_if_blank, StringExt};
