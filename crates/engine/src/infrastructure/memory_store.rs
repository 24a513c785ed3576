//! In-memory relational store for development and testing
//!
//! Implements every repository port over plain collections behind one lock.
//! Join rows are checked against their parents the way foreign keys would be.
//! Nothing is persisted.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use storykin_domain::catalog::is_presentation_only;
use storykin_domain::{
    ChildId, ComforterId, FamilyId, FamilyMemberId, LookupId, PetId, SelectionCategory, UserId,
};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{
    ChildComforterLink, ChildFamilyMemberLink, ChildPetLink, ChildProfileRecord,
    ChildProfileUpdate, ChildRepo, ComforterRecord, ComforterRepo, FamilyMemberRecord,
    FamilyMemberRepo, FamilyRecord, FamilyRepo, LinkRepo, LookupRepo, LookupRow, LookupTable,
    NewChildProfile, NewComforter, NewFamilyMember, NewPet, PetRecord, PetRepo, ProfileRepo,
    RepoError,
};

/// Tables of the in-memory store, used to inject write failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreTable {
    Profiles,
    Families,
    FamilyMembers,
    Children,
    Pets,
    Comforters,
    Preferences(LookupTable),
    ChildFamilyMembers,
    ChildPets,
    ChildComforters,
}

#[derive(Default)]
struct Tables {
    profiles: HashMap<UserId, Option<FamilyId>>,
    families: HashMap<FamilyId, FamilyRecord>,
    family_members: Vec<FamilyMemberRecord>,
    children: HashMap<ChildId, ChildProfileRecord>,
    pets: Vec<PetRecord>,
    comforters: HashMap<ComforterId, ComforterRecord>,
    lookups: HashMap<LookupTable, Vec<LookupRow>>,
    preference_links: Vec<(LookupTable, ChildId, LookupId)>,
    member_links: Vec<ChildFamilyMemberLink>,
    pet_links: Vec<ChildPetLink>,
    comforter_links: Vec<ChildComforterLink>,
}

impl Tables {
    fn require_child(&self, id: ChildId) -> Result<(), RepoError> {
        if self.children.contains_key(&id) {
            Ok(())
        } else {
            Err(RepoError::constraint(format!("child {} does not exist", id)))
        }
    }

    fn require_family(&self, id: FamilyId) -> Result<(), RepoError> {
        if self.families.contains_key(&id) {
            Ok(())
        } else {
            Err(RepoError::constraint(format!("family {} does not exist", id)))
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    failing: Arc<Mutex<HashSet<StoreTable>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose lookup tables hold one row per resolvable catalog label.
    pub fn with_catalog_lookups() -> Self {
        let mut tables = Tables::default();
        for category in SelectionCategory::ALL {
            let rows = category
                .catalog()
                .entries
                .iter()
                .filter(|entry| !is_presentation_only(entry.value))
                .map(|entry| LookupRow {
                    id: LookupId::new(),
                    label: entry.label.to_string(),
                })
                .collect();
            tables.lookups.insert(LookupTable::from(category), rows);
        }
        Self {
            tables: Arc::new(RwLock::new(tables)),
            failing: Arc::default(),
        }
    }

    /// Makes every subsequent write to `table` fail with a database error.
    pub fn fail_writes_to(&self, table: StoreTable) {
        match self.failing.lock() {
            Ok(mut failing) => {
                failing.insert(table);
            }
            Err(e) => tracing::error!("Failed to register store fault: {}", e),
        }
    }

    fn check_writable(&self, table: StoreTable, operation: &'static str) -> Result<(), RepoError> {
        let failing = self
            .failing
            .lock()
            .map_err(|e| RepoError::database(operation, e))?;
        if failing.contains(&table) {
            return Err(RepoError::database(operation, "write rejected"));
        }
        Ok(())
    }

    // =========================================================================
    // Seeding
    // =========================================================================

    pub async fn seed_family(&self, owner: UserId, name: &str) -> FamilyId {
        let record = FamilyRecord {
            id: FamilyId::new(),
            name: name.to_string(),
            owner,
        };
        let id = record.id;
        let mut tables = self.tables.write().await;
        tables.families.insert(id, record);
        tables.profiles.insert(owner, Some(id));
        id
    }

    pub async fn seed_family_member(&self, family_id: FamilyId, name: &str) -> FamilyMemberId {
        let record = FamilyMemberRecord {
            id: FamilyMemberId::new(),
            family_id,
            name: name.to_string(),
            role: String::new(),
            payload: serde_json::Value::Null,
        };
        let id = record.id;
        self.tables.write().await.family_members.push(record);
        id
    }

    pub async fn seed_child(&self, family_id: FamilyId, first_name: &str) -> ChildId {
        let record = ChildProfileRecord {
            id: ChildId::new(),
            family_id,
            first_name: first_name.to_string(),
            details: serde_json::Value::Null,
            has_pets: false,
        };
        let id = record.id;
        self.tables.write().await.children.insert(id, record);
        id
    }

    pub async fn seed_pet(&self, family_id: FamilyId, name: &str, pet_type: &str) -> PetId {
        let record = PetRecord {
            id: PetId::new(),
            family_id,
            name: name.to_string(),
            pet_type: pet_type.to_string(),
            breed: None,
            details: serde_json::Value::Null,
        };
        let id = record.id;
        self.tables.write().await.pets.push(record);
        id
    }

    pub async fn seed_comforter(&self, owner: UserId, label: &str, type_tag: &str) -> ComforterId {
        let record = ComforterRecord {
            id: ComforterId::new(),
            label: label.to_string(),
            type_tag: type_tag.to_string(),
            is_active: false,
            created_by: owner,
        };
        let id = record.id;
        self.tables.write().await.comforters.insert(id, record);
        id
    }

    /// Deletes the lookup row carrying `label`, if any.
    pub async fn remove_lookup(&self, table: LookupTable, label: &str) {
        if let Some(rows) = self.tables.write().await.lookups.get_mut(&table) {
            rows.retain(|row| row.label != label);
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub async fn families(&self) -> Vec<FamilyRecord> {
        self.tables.read().await.families.values().cloned().collect()
    }

    pub async fn children(&self) -> Vec<ChildProfileRecord> {
        self.tables.read().await.children.values().cloned().collect()
    }

    pub async fn family_members(&self) -> Vec<FamilyMemberRecord> {
        self.tables.read().await.family_members.clone()
    }

    pub async fn pets(&self) -> Vec<PetRecord> {
        self.tables.read().await.pets.clone()
    }

    pub async fn comforters(&self) -> Vec<ComforterRecord> {
        self.tables.read().await.comforters.values().cloned().collect()
    }

    pub async fn lookup_id(&self, table: LookupTable, label: &str) -> Option<LookupId> {
        self.tables
            .read()
            .await
            .lookups
            .get(&table)
            .and_then(|rows| rows.iter().find(|row| row.label == label))
            .map(|row| row.id)
    }

    /// Linked lookup ids in insertion order.
    pub async fn preference_links(&self, table: LookupTable, child_id: ChildId) -> Vec<LookupId> {
        self.tables
            .read()
            .await
            .preference_links
            .iter()
            .filter(|(t, c, _)| *t == table && *c == child_id)
            .map(|(_, _, id)| *id)
            .collect()
    }

    pub async fn member_links(&self, child_id: ChildId) -> Vec<FamilyMemberId> {
        self.tables
            .read()
            .await
            .member_links
            .iter()
            .filter(|link| link.child_id == child_id)
            .map(|link| link.family_member_id)
            .collect()
    }

    pub async fn pet_links(&self, child_id: ChildId) -> Vec<ChildPetLink> {
        self.tables
            .read()
            .await
            .pet_links
            .iter()
            .filter(|link| link.child_id == child_id)
            .cloned()
            .collect()
    }

    pub async fn comforter_links(&self, child_id: ChildId) -> Vec<ComforterId> {
        self.tables
            .read()
            .await
            .comforter_links
            .iter()
            .filter(|link| link.child_id == child_id)
            .map(|link| link.comforter_id)
            .collect()
    }
}

#[async_trait]
impl ProfileRepo for InMemoryStore {
    async fn get_family_id(&self, user_id: UserId) -> Result<Option<FamilyId>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .profiles
            .get(&user_id)
            .copied()
            .flatten())
    }

    async fn set_family_id(&self, user_id: UserId, family_id: FamilyId) -> Result<(), RepoError> {
        self.check_writable(StoreTable::Profiles, "profile.set_family_id")?;
        let mut tables = self.tables.write().await;
        tables.require_family(family_id)?;
        tables.profiles.insert(user_id, Some(family_id));
        Ok(())
    }
}

#[async_trait]
impl FamilyRepo for InMemoryStore {
    async fn get(&self, id: FamilyId) -> Result<Option<FamilyRecord>, RepoError> {
        Ok(self.tables.read().await.families.get(&id).cloned())
    }

    async fn create(&self, owner: UserId, name: String) -> Result<FamilyRecord, RepoError> {
        self.check_writable(StoreTable::Families, "family.create")?;
        let record = FamilyRecord {
            id: FamilyId::new(),
            name,
            owner,
        };
        self.tables
            .write()
            .await
            .families
            .insert(record.id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl FamilyMemberRepo for InMemoryStore {
    async fn insert_many(
        &self,
        members: Vec<NewFamilyMember>,
    ) -> Result<Vec<FamilyMemberRecord>, RepoError> {
        self.check_writable(StoreTable::FamilyMembers, "family_member.insert_many")?;
        let mut tables = self.tables.write().await;
        for member in &members {
            tables.require_family(member.family_id)?;
        }
        let records: Vec<FamilyMemberRecord> = members
            .into_iter()
            .map(|member| FamilyMemberRecord {
                id: FamilyMemberId::new(),
                family_id: member.family_id,
                name: member.name,
                role: member.role,
                payload: member.payload,
            })
            .collect();
        tables.family_members.extend(records.iter().cloned());
        Ok(records)
    }
}

#[async_trait]
impl ChildRepo for InMemoryStore {
    async fn get(&self, id: ChildId) -> Result<Option<ChildProfileRecord>, RepoError> {
        Ok(self.tables.read().await.children.get(&id).cloned())
    }

    async fn create(&self, child: NewChildProfile) -> Result<ChildProfileRecord, RepoError> {
        self.check_writable(StoreTable::Children, "child.create")?;
        let mut tables = self.tables.write().await;
        tables.require_family(child.family_id)?;
        let record = ChildProfileRecord {
            id: ChildId::new(),
            family_id: child.family_id,
            first_name: child.first_name,
            details: child.details,
            has_pets: child.has_pets,
        };
        tables.children.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: ChildId, update: ChildProfileUpdate) -> Result<(), RepoError> {
        self.check_writable(StoreTable::Children, "child.update")?;
        let mut tables = self.tables.write().await;
        let record = tables
            .children
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Child", id))?;
        record.first_name = update.first_name;
        record.details = update.details;
        record.has_pets = update.has_pets;
        Ok(())
    }
}

#[async_trait]
impl PetRepo for InMemoryStore {
    async fn insert_many(&self, pets: Vec<NewPet>) -> Result<Vec<PetRecord>, RepoError> {
        self.check_writable(StoreTable::Pets, "pet.insert_many")?;
        let mut tables = self.tables.write().await;
        for pet in &pets {
            tables.require_family(pet.family_id)?;
        }
        let records: Vec<PetRecord> = pets
            .into_iter()
            .map(|pet| PetRecord {
                id: PetId::new(),
                family_id: pet.family_id,
                name: pet.name,
                pet_type: pet.pet_type,
                breed: pet.breed,
                details: pet.details,
            })
            .collect();
        tables.pets.extend(records.iter().cloned());
        Ok(records)
    }

    async fn get_many(&self, ids: Vec<PetId>) -> Result<Vec<PetRecord>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .pets
            .iter()
            .filter(|pet| ids.contains(&pet.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ComforterRepo for InMemoryStore {
    async fn create(&self, comforter: NewComforter) -> Result<ComforterRecord, RepoError> {
        self.check_writable(StoreTable::Comforters, "comforter.create")?;
        let record = ComforterRecord {
            id: ComforterId::new(),
            label: comforter.label,
            type_tag: comforter.type_tag,
            is_active: comforter.is_active,
            created_by: comforter.created_by,
        };
        self.tables
            .write()
            .await
            .comforters
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn activate(&self, id: ComforterId, label: String) -> Result<(), RepoError> {
        self.check_writable(StoreTable::Comforters, "comforter.activate")?;
        let mut tables = self.tables.write().await;
        let record = tables
            .comforters
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Comforter", id))?;
        record.label = label;
        record.is_active = true;
        Ok(())
    }
}

#[async_trait]
impl LookupRepo for InMemoryStore {
    async fn find_by_labels(
        &self,
        table: LookupTable,
        labels: Vec<String>,
    ) -> Result<Vec<LookupRow>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .lookups
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| labels.contains(&row.label))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl LinkRepo for InMemoryStore {
    async fn link_preferences(
        &self,
        table: LookupTable,
        child_id: ChildId,
        ids: Vec<LookupId>,
    ) -> Result<(), RepoError> {
        self.check_writable(StoreTable::Preferences(table), "link.preferences")?;
        let mut tables = self.tables.write().await;
        tables.require_child(child_id)?;
        let known: HashSet<LookupId> = tables
            .lookups
            .get(&table)
            .map(|rows| rows.iter().map(|row| row.id).collect())
            .unwrap_or_default();
        if let Some(missing) = ids.iter().find(|id| !known.contains(id)) {
            return Err(RepoError::constraint(format!(
                "{} has no row {}",
                table, missing
            )));
        }
        tables
            .preference_links
            .extend(ids.into_iter().map(|id| (table, child_id, id)));
        Ok(())
    }

    async fn clear_preferences(
        &self,
        table: LookupTable,
        child_id: ChildId,
    ) -> Result<(), RepoError> {
        self.check_writable(StoreTable::Preferences(table), "link.clear_preferences")?;
        self.tables
            .write()
            .await
            .preference_links
            .retain(|(t, c, _)| !(*t == table && *c == child_id));
        Ok(())
    }

    async fn link_family_members(
        &self,
        links: Vec<ChildFamilyMemberLink>,
    ) -> Result<(), RepoError> {
        self.check_writable(StoreTable::ChildFamilyMembers, "link.family_members")?;
        let mut tables = self.tables.write().await;
        for link in &links {
            tables.require_child(link.child_id)?;
            if !tables
                .family_members
                .iter()
                .any(|m| m.id == link.family_member_id)
            {
                return Err(RepoError::constraint(format!(
                    "family member {} does not exist",
                    link.family_member_id
                )));
            }
        }
        tables.member_links.extend(links);
        Ok(())
    }

    async fn link_pets(&self, links: Vec<ChildPetLink>) -> Result<(), RepoError> {
        self.check_writable(StoreTable::ChildPets, "link.pets")?;
        let mut tables = self.tables.write().await;
        for link in &links {
            tables.require_child(link.child_id)?;
            if !tables.pets.iter().any(|p| p.id == link.pet_id) {
                return Err(RepoError::constraint(format!(
                    "pet {} does not exist",
                    link.pet_id
                )));
            }
        }
        tables.pet_links.extend(links);
        Ok(())
    }

    async fn link_comforter(&self, link: ChildComforterLink) -> Result<(), RepoError> {
        self.check_writable(StoreTable::ChildComforters, "link.comforter")?;
        let mut tables = self.tables.write().await;
        tables.require_child(link.child_id)?;
        if !tables.comforters.contains_key(&link.comforter_id) {
            return Err(RepoError::constraint(format!(
                "comforter {} does not exist",
                link.comforter_id
            )));
        }
        tables.comforter_links.push(link);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn catalog_lookups_skip_presentation_tokens() {
        let store = InMemoryStore::with_catalog_lookups();
        let rows = store
            .find_by_labels(LookupTable::Discoveries, vec!["Nothing in particular".to_string()])
            .await
            .expect("lookup");
        assert!(rows.is_empty());
        assert!(store
            .lookup_id(LookupTable::Superpowers, "Kindness")
            .await
            .is_some());
    }

    #[tokio::test]
    async fn join_rows_require_persisted_parents() {
        let store = InMemoryStore::new();
        let err = store
            .link_family_members(vec![ChildFamilyMemberLink {
                child_id: ChildId::new(),
                family_member_id: FamilyMemberId::new(),
            }])
            .await
            .expect_err("expected an error");
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn injected_failures_only_hit_their_table() {
        let store = InMemoryStore::new();
        store.fail_writes_to(StoreTable::Children);
        let family = FamilyRepo::create(&store, UserId::new(), "Ada 2020 #abc123".into())
            .await
            .expect("families still writable");
        let err = ChildRepo::create(
            &store,
            NewChildProfile {
                family_id: family.id,
                first_name: "Ada".into(),
                details: serde_json::Value::Null,
                has_pets: false,
                created_by: family.owner,
            },
        )
        .await
        .expect_err("expected an error");
        assert!(matches!(err, RepoError::Database { .. }));
    }

    #[tokio::test]
    async fn clearing_preferences_is_scoped_to_child_and_table() {
        let store = InMemoryStore::with_catalog_lookups();
        let owner = UserId::new();
        let family = store.seed_family(owner, "F").await;
        let ada = store.seed_child(family, "Ada").await;
        let bo = store.seed_child(family, "Bo").await;
        let kindness = store
            .lookup_id(LookupTable::Superpowers, "Kindness")
            .await
            .expect("seeded");

        store
            .link_preferences(LookupTable::Superpowers, ada, vec![kindness])
            .await
            .expect("link ada");
        store
            .link_preferences(LookupTable::Superpowers, bo, vec![kindness])
            .await
            .expect("link bo");
        store
            .clear_preferences(LookupTable::Superpowers, ada)
            .await
            .expect("clear");

        assert!(store
            .preference_links(LookupTable::Superpowers, ada)
            .await
            .is_empty());
        assert_eq!(
            store.preference_links(LookupTable::Superpowers, bo).await,
            vec![kindness]
        );
    }
}
