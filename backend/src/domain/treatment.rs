//! Treatments prescribed to a pet. Dates carry no ordering constraint.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patch::define_patch;
use super::ports::RecordStore;
use super::rules::{ManagedResource, RuleContext};
use super::{ClinicStores, Error, OwnerRef, PetId, Resource, ResourceKind, TreatmentId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub id: TreatmentId,
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub pet_id: PetId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTreatment {
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub pet_id: PetId,
}

define_patch! {
    pub struct TreatmentPatch for Treatment {
        name: String,
        description: String,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        pet_id: PetId,
    }
}

impl Resource for Treatment {
    type Id = TreatmentId;
    type Draft = NewTreatment;
    type Patch = TreatmentPatch;

    const KIND: ResourceKind = ResourceKind::Treatment;

    fn id(&self) -> TreatmentId {
        self.id
    }

    fn owner(&self) -> OwnerRef {
        OwnerRef::Pet(self.pet_id)
    }

    fn draft_owner(draft: &NewTreatment) -> OwnerRef {
        OwnerRef::Pet(draft.pet_id)
    }

    fn from_draft(id: TreatmentId, draft: NewTreatment) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            pet_id: draft.pet_id,
        }
    }
}

#[async_trait]
impl ManagedResource for Treatment {
    fn store(stores: &ClinicStores) -> &Arc<dyn RecordStore<Self>> {
        &stores.treatments
    }

    async fn check_create(draft: NewTreatment, _ctx: &RuleContext) -> Result<NewTreatment, Error> {
        Ok(draft)
    }

    async fn check_update(
        _existing: &Self,
        patch: TreatmentPatch,
        ctx: &RuleContext,
    ) -> Result<TreatmentPatch, Error> {
        if let Some(pet_id) = patch.pet_id {
            ctx.require_pet(pet_id).await?;
        }
        Ok(patch)
    }
}
