//! Relational store ports, one per entity concern.

use async_trait::async_trait;
use storykin_domain::{ChildId, ComforterId, FamilyId, LookupId, PetId, UserId};

use super::error::RepoError;
use super::types::{
    ChildComforterLink, ChildFamilyMemberLink, ChildPetLink, ChildProfileRecord,
    ChildProfileUpdate, ComforterRecord, FamilyMemberRecord, FamilyRecord, LookupRow,
    LookupTable, NewChildProfile, NewComforter, NewFamilyMember, NewPet, PetRecord,
};

/// Family reference carried on the signed-in user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get_family_id(&self, user_id: UserId) -> Result<Option<FamilyId>, RepoError>;
    async fn set_family_id(&self, user_id: UserId, family_id: FamilyId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FamilyRepo: Send + Sync {
    async fn get(&self, id: FamilyId) -> Result<Option<FamilyRecord>, RepoError>;
    async fn create(&self, owner: UserId, name: String) -> Result<FamilyRecord, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FamilyMemberRepo: Send + Sync {
    /// Inserts all members in one call; rows come back in input order.
    async fn insert_many(
        &self,
        members: Vec<NewFamilyMember>,
    ) -> Result<Vec<FamilyMemberRecord>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChildRepo: Send + Sync {
    async fn get(&self, id: ChildId) -> Result<Option<ChildProfileRecord>, RepoError>;
    async fn create(&self, child: NewChildProfile) -> Result<ChildProfileRecord, RepoError>;
    async fn update(&self, id: ChildId, update: ChildProfileUpdate) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetRepo: Send + Sync {
    /// Inserts all pets in one call; rows come back in input order.
    async fn insert_many(&self, pets: Vec<NewPet>) -> Result<Vec<PetRecord>, RepoError>;
    async fn get_many(&self, ids: Vec<PetId>) -> Result<Vec<PetRecord>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComforterRepo: Send + Sync {
    async fn create(&self, comforter: NewComforter) -> Result<ComforterRecord, RepoError>;
    /// Marks an existing comforter active and renames it.
    async fn activate(&self, id: ComforterId, label: String) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LookupRepo: Send + Sync {
    /// Rows of `table` whose label is one of `labels`, in any order.
    async fn find_by_labels(
        &self,
        table: LookupTable,
        labels: Vec<String>,
    ) -> Result<Vec<LookupRow>, RepoError>;
}

/// Join rows between a child and its related entities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepo: Send + Sync {
    async fn link_preferences(
        &self,
        table: LookupTable,
        child_id: ChildId,
        ids: Vec<LookupId>,
    ) -> Result<(), RepoError>;
    async fn clear_preferences(&self, table: LookupTable, child_id: ChildId)
        -> Result<(), RepoError>;
    async fn link_family_members(&self, links: Vec<ChildFamilyMemberLink>)
        -> Result<(), RepoError>;
    async fn link_pets(&self, links: Vec<ChildPetLink>) -> Result<(), RepoError>;
    async fn link_comforter(&self, link: ChildComforterLink) -> Result<(), RepoError>;
}
