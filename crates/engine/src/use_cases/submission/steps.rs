//! Individual saga steps.
//!
//! A step returning `Err` is handled by the executor according to its
//! severity. Steps that write several independent items record per-item
//! warnings themselves and keep going.

use storykin_domain::common::none_if_blank;
use storykin_domain::{BasicInfo, ChildId, SelectionCategory, Toy, UserId};

use crate::infrastructure::ports::{
    ChildComforterLink, ChildFamilyMemberLink, ChildPetLink, ChildProfileUpdate, LookupTable,
    NewChildProfile, NewComforter, NewFamilyMember, NewPet, RandomPort,
};

use super::error::StepError;
use super::payload;
use super::saga::SagaStep;
use super::{SagaContext, SubmitChildProfile};

const FAMILY_SUFFIX_LEN: usize = 6;
const FAMILY_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Name for a freshly created family: `"<FirstName> <birth year> #<suffix>"`.
///
/// The random suffix keeps two children with the same name and birth year apart.
pub fn family_name(basic_info: &BasicInfo, random: &dyn RandomPort) -> String {
    let max_index = (FAMILY_SUFFIX_ALPHABET.len() - 1) as i32;
    let suffix: String = (0..FAMILY_SUFFIX_LEN)
        .map(|_| {
            let index = usize::try_from(random.gen_range(0, max_index)).unwrap_or(0);
            char::from(FAMILY_SUFFIX_ALPHABET.get(index).copied().unwrap_or(b'0'))
        })
        .collect();

    let mut parts = vec![basic_info.first_name.trim().to_string()];
    if let Some(year) = basic_info.birth_year() {
        parts.push(year.to_string());
    }
    parts.push(format!("#{}", suffix));
    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}

impl SubmitChildProfile {
    pub(super) async fn run_step(
        &self,
        step: SagaStep,
        ctx: &mut SagaContext<'_>,
    ) -> Result<(), StepError> {
        match step {
            SagaStep::ResolveFamily => self.resolve_family(ctx).await,
            SagaStep::CreateRelatives => self.create_relatives(ctx).await,
            SagaStep::CreateChildProfile => self.save_child_profile(ctx).await,
            SagaStep::LinkPreferences(category) => self.link_preferences(category, ctx).await,
            SagaStep::LinkRelatives => self.link_relatives(ctx).await,
            SagaStep::Pets => self.save_pets(ctx).await,
            SagaStep::Comforters => self.save_comforters(ctx).await,
        }
    }

    async fn resolve_family(&self, ctx: &mut SagaContext<'_>) -> Result<(), StepError> {
        if let Some(family_id) = self.repos.profiles.get_family_id(ctx.user_id).await? {
            tracing::debug!(family_id = %family_id, "Reusing the user's family");
            ctx.family_id = Some(family_id);
            return Ok(());
        }

        if ctx.is_edit() {
            return Err(StepError::MissingPrerequisite("family for the child being edited"));
        }

        let name = family_name(&ctx.draft.basic_info, self.random.as_ref());
        let family = self.repos.families.create(ctx.user_id, name).await?;
        tracing::info!(family_id = %family.id, name = %family.name, "Family created");
        ctx.family_id = Some(family.id);
        ctx.family_created = true;

        // The family exists either way; only the shortcut on the profile is lost
        if let Err(e) = self
            .repos
            .profiles
            .set_family_id(ctx.user_id, family.id)
            .await
        {
            self.warn(
                ctx,
                SagaStep::ResolveFamily,
                format!("The family could not be attached to your account ({})", e),
            );
        }
        Ok(())
    }

    async fn create_relatives(&self, ctx: &mut SagaContext<'_>) -> Result<(), StepError> {
        let draft = ctx.draft;
        let relatives = &draft.family.relatives;
        if relatives.is_empty() {
            return Ok(());
        }
        let family_id = ctx.family()?;

        let members = relatives
            .iter()
            .map(|relative| {
                Ok(NewFamilyMember {
                    family_id,
                    name: relative.nickname.trim().to_string(),
                    role: relative.role_label(),
                    payload: payload::relative_payload(relative)?,
                    created_by: ctx.user_id,
                })
            })
            .collect::<Result<Vec<_>, StepError>>()?;

        let records = self.repos.members.insert_many(members).await?;
        if records.len() != relatives.len() {
            tracing::warn!(
                expected = relatives.len(),
                returned = records.len(),
                "Store returned an unexpected number of family members"
            );
        }

        ctx.created_relatives = relatives
            .iter()
            .map(|r| r.local_id)
            .zip(records.iter().map(|r| r.id))
            .collect();
        ctx.counts.relatives_created = ctx.created_relatives.len();
        Ok(())
    }

    async fn save_child_profile(&self, ctx: &mut SagaContext<'_>) -> Result<(), StepError> {
        let family_id = ctx.family()?;
        let draft = ctx.draft;
        let details = payload::child_details(draft)?;
        let first_name = draft.basic_info.first_name.trim().to_string();
        let has_pets = draft.pets.has_pets();

        if ctx.is_edit() {
            let child_id = draft
                .editing_child_id
                .ok_or(StepError::MissingPrerequisite("child being edited"))?;
            self.repos
                .children
                .update(
                    child_id,
                    ChildProfileUpdate {
                        first_name,
                        details,
                        has_pets,
                    },
                )
                .await?;
            tracing::info!(child_id = %child_id, "Child profile updated");
            ctx.child_id = Some(child_id);
        } else {
            let child = self
                .repos
                .children
                .create(NewChildProfile {
                    family_id,
                    first_name,
                    details,
                    has_pets,
                    created_by: ctx.user_id,
                })
                .await?;
            tracing::info!(child_id = %child.id, family_id = %family_id, "Child profile created");
            ctx.child_id = Some(child.id);
        }
        Ok(())
    }

    async fn link_preferences(
        &self,
        category: SelectionCategory,
        ctx: &mut SagaContext<'_>,
    ) -> Result<(), StepError> {
        let child_id = ctx.child()?;
        let table = LookupTable::from(category);
        let ids = self
            .lookup
            .resolve(category, ctx.draft.selections(category))
            .await?;

        // Edits replace the previous selection
        if ctx.is_edit() {
            self.repos.links.clear_preferences(table, child_id).await?;
        }
        if ids.is_empty() {
            return Ok(());
        }

        let count = ids.len();
        self.repos
            .links
            .link_preferences(table, child_id, ids)
            .await?;
        ctx.counts.preferences_linked.push((category, count));
        Ok(())
    }

    async fn link_relatives(&self, ctx: &mut SagaContext<'_>) -> Result<(), StepError> {
        let child_id = ctx.child()?;
        let draft = ctx.draft;

        let mut links: Vec<ChildFamilyMemberLink> = ctx
            .created_relatives
            .iter()
            .map(|(_, member_id)| *member_id)
            .chain(draft.family.existing_relative_ids.iter().copied())
            .map(|family_member_id| ChildFamilyMemberLink {
                child_id,
                family_member_id,
            })
            .collect();

        for (local_id, siblings) in &draft.family.relative_child_links {
            let Some(family_member_id) = ctx.created_relative(*local_id) else {
                self.warn(
                    ctx,
                    SagaStep::LinkRelatives,
                    "A relative shared with another child was not saved, so it was not linked",
                );
                continue;
            };
            links.extend(
                siblings
                    .iter()
                    .filter(|sibling| **sibling != child_id)
                    .map(|sibling| ChildFamilyMemberLink {
                        child_id: *sibling,
                        family_member_id,
                    }),
            );
        }

        if links.is_empty() {
            return Ok(());
        }
        let count = links.len();
        self.repos.links.link_family_members(links).await?;
        ctx.counts.relatives_linked = count;
        Ok(())
    }

    async fn save_pets(&self, ctx: &mut SagaContext<'_>) -> Result<(), StepError> {
        let draft = ctx.draft;
        if !draft.pets.has_pets() {
            tracing::debug!("Child has no pets, skipping");
            return Ok(());
        }
        let child_id = ctx.child()?;
        let family_id = ctx.family()?;
        let mut links: Vec<ChildPetLink> = Vec::new();

        // New pets
        let pets = draft.pets.pets();
        if !pets.is_empty() {
            let new_pets = pets
                .iter()
                .map(|pet| {
                    Ok(NewPet {
                        family_id,
                        name: pet.name.trim().to_string(),
                        pet_type: pet.type_name(),
                        breed: pet.breed.as_deref().and_then(none_if_blank),
                        details: payload::pet_details(pet)?,
                    })
                })
                .collect::<Result<Vec<_>, StepError>>()?;

            match self.repos.pets.insert_many(new_pets).await {
                Ok(records) => {
                    for (pet, record) in pets.iter().zip(records) {
                        let link = ChildPetLink {
                            child_id,
                            pet_id: record.id,
                            display_name: record.name,
                            trait_summary: none_if_blank(&pet.trait_summary()),
                        };
                        ctx.created_pets.push((pet.local_id, link.clone()));
                        links.push(link);
                    }
                    ctx.counts.pets_created = ctx.created_pets.len();
                }
                Err(e) => self.warn(
                    ctx,
                    SagaStep::Pets,
                    format!("Your new pets could not be saved ({})", e),
                ),
            }
        }

        // Pets already in the family
        let existing = draft.pets.existing_ids();
        if !existing.is_empty() {
            match self.repos.pets.get_many(existing.to_vec()).await {
                Ok(records) => {
                    for id in existing {
                        match records.iter().find(|record| record.id == *id) {
                            Some(record) => links.push(ChildPetLink {
                                child_id,
                                pet_id: record.id,
                                display_name: record.name.clone(),
                                trait_summary: None,
                            }),
                            None => self.warn(
                                ctx,
                                SagaStep::Pets,
                                format!("A selected pet no longer exists ({})", id),
                            ),
                        }
                    }
                }
                Err(e) => self.warn(
                    ctx,
                    SagaStep::Pets,
                    format!("Your existing pets could not be loaded ({})", e),
                ),
            }
        }

        // Pets shared with other children
        for (local_id, siblings) in &draft.pets.pet_child_links {
            let Some(template) = ctx.created_pet(*local_id).cloned() else {
                self.warn(
                    ctx,
                    SagaStep::Pets,
                    "A pet shared with another child was not saved, so it was not linked",
                );
                continue;
            };
            links.extend(
                siblings
                    .iter()
                    .filter(|sibling| **sibling != child_id)
                    .map(|sibling| ChildPetLink {
                        child_id: *sibling,
                        ..template.clone()
                    }),
            );
        }

        if links.is_empty() {
            return Ok(());
        }
        let count = links.len();
        self.repos.links.link_pets(links).await?;
        ctx.counts.pets_linked = count;
        Ok(())
    }

    async fn save_comforters(&self, ctx: &mut SagaContext<'_>) -> Result<(), StepError> {
        let draft = ctx.draft;
        if !draft.toys.has_toys() {
            return Ok(());
        }
        let child_id = ctx.child()?;

        for toy in draft.toys.toys() {
            let label = toy.display_label();
            match toy.comforter_id {
                Some(comforter_id) => {
                    match self.repos.comforters.activate(comforter_id, label.clone()).await {
                        Ok(()) => ctx.counts.comforters_updated += 1,
                        Err(e) => self.warn(
                            ctx,
                            SagaStep::Comforters,
                            format!("{} could not be updated ({})", label, e),
                        ),
                    }
                }
                None => match self.create_comforter(toy, child_id, ctx.user_id).await {
                    Ok(()) => ctx.counts.comforters_created += 1,
                    Err(e) => self.warn(
                        ctx,
                        SagaStep::Comforters,
                        format!("{} could not be saved ({})", label, e),
                    ),
                },
            }
        }
        Ok(())
    }

    async fn create_comforter(
        &self,
        toy: &Toy,
        child_id: ChildId,
        user_id: UserId,
    ) -> Result<(), StepError> {
        let comforter = self
            .repos
            .comforters
            .create(NewComforter {
                label: toy.display_label(),
                type_tag: toy.toy_type.icon().to_string(),
                is_active: true,
                created_by: user_id,
            })
            .await?;
        self.repos
            .links
            .link_comforter(ChildComforterLink {
                child_id,
                comforter_id: comforter.id,
            })
            .await?;
        Ok(())
    }
}
