//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Relational store access (one trait per entity concern)
//! - Session identity, local key/value storage, notifications, navigation
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{
    ChildRepo, ComforterRepo, FamilyMemberRepo, FamilyRepo, LinkRepo, LookupRepo, PetRepo,
    ProfileRepo,
};

pub use types::{
    ChildComforterLink, ChildFamilyMemberLink, ChildPetLink, ChildProfileRecord,
    ChildProfileUpdate, ComforterRecord, FamilyMemberRecord, FamilyRecord, LookupRow,
    LookupTable, NewChildProfile, NewComforter, NewFamilyMember, NewPet, PetRecord,
};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    Destination, KeyValueStore, NavigatorPort, Notification, NotificationLevel,
    NotificationPort, SessionPort,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{
    MockChildRepo, MockComforterRepo, MockFamilyMemberRepo, MockFamilyRepo, MockLinkRepo,
    MockLookupRepo, MockPetRepo, MockProfileRepo,
};

#[cfg(test)]
pub use external::{
    MockKeyValueStore, MockNavigatorPort, MockNotificationPort, MockSessionPort,
};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{RepoError, StorageError};
