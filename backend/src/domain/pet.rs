//! Pets and their owners.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::patch::define_patch;
use super::ports::RecordStore;
use super::rules::{ManagedResource, RuleContext};
use super::temporal::TemporalRule;
use super::{ClinicStores, Error, OwnerRef, PetId, Resource, ResourceKind, UserId};

/// A patient of the clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    /// Free text; only dogs and cats have a vaccination eligibility matrix.
    pub species: String,
    pub breed: String,
    pub birth_date: DateTime<Utc>,
    pub color: String,
    pub owner_id: UserId,
}

/// A pet that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub birth_date: DateTime<Utc>,
    pub color: String,
    pub owner_id: UserId,
}

define_patch! {
    /// Partial pet update. Naming another `ownerId` transfers the pet.
    pub struct PetPatch for Pet {
        name: String,
        species: String,
        breed: String,
        birth_date: DateTime<Utc>,
        color: String,
        owner_id: UserId,
    }
}

impl Resource for Pet {
    type Id = PetId;
    type Draft = NewPet;
    type Patch = PetPatch;

    const KIND: ResourceKind = ResourceKind::Pet;

    fn id(&self) -> PetId {
        self.id
    }

    fn owner(&self) -> OwnerRef {
        OwnerRef::User(self.owner_id)
    }

    fn draft_owner(draft: &NewPet) -> OwnerRef {
        OwnerRef::User(draft.owner_id)
    }

    fn from_draft(id: PetId, draft: NewPet) -> Self {
        Self {
            id,
            name: draft.name,
            species: draft.species,
            breed: draft.breed,
            birth_date: draft.birth_date,
            color: draft.color,
            owner_id: draft.owner_id,
        }
    }
}

#[async_trait]
impl ManagedResource for Pet {
    fn store(stores: &ClinicStores) -> &Arc<dyn RecordStore<Self>> {
        &stores.pets
    }

    async fn check_create(mut draft: NewPet, ctx: &RuleContext) -> Result<NewPet, Error> {
        draft.birth_date = ctx
            .temporal()
            .evaluate(TemporalRule::NotAfter, "birthDate", draft.birth_date)?;
        Ok(draft)
    }

    async fn check_update(
        existing: &Self,
        mut patch: PetPatch,
        ctx: &RuleContext,
    ) -> Result<PetPatch, Error> {
        patch.birth_date = ctx.temporal().evaluate_present(
            TemporalRule::NotAfter,
            "birthDate",
            patch.birth_date,
        )?;
        if let Some(owner_id) = patch.owner_id.filter(|id| *id != existing.owner_id) {
            ctx.require_user(owner_id).await?;
        }
        Ok(patch)
    }
}
