//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod memory_store;
pub mod notifications;
pub mod ports;
pub mod storage;
