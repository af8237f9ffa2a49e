//! Veterinary consultations booked for a pet.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patch::define_patch;
use super::ports::RecordStore;
use super::rules::{ManagedResource, RuleContext};
use super::temporal::TemporalRule;
use super::{ClinicStores, ConsultationId, Error, OwnerRef, PetId, Resource, ResourceKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub id: ConsultationId,
    pub veterinarian: String,
    pub description: String,
    /// Strictly after the time the consultation was booked or moved.
    pub date: DateTime<Utc>,
    pub pet_id: PetId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConsultation {
    pub veterinarian: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub pet_id: PetId,
}

define_patch! {
    pub struct ConsultationPatch for Consultation {
        veterinarian: String,
        description: String,
        date: DateTime<Utc>,
        pet_id: PetId,
    }
}

impl Resource for Consultation {
    type Id = ConsultationId;
    type Draft = NewConsultation;
    type Patch = ConsultationPatch;

    const KIND: ResourceKind = ResourceKind::Consultation;

    fn id(&self) -> ConsultationId {
        self.id
    }

    fn owner(&self) -> OwnerRef {
        OwnerRef::Pet(self.pet_id)
    }

    fn draft_owner(draft: &NewConsultation) -> OwnerRef {
        OwnerRef::Pet(draft.pet_id)
    }

    fn from_draft(id: ConsultationId, draft: NewConsultation) -> Self {
        Self {
            id,
            veterinarian: draft.veterinarian,
            description: draft.description,
            date: draft.date,
            pet_id: draft.pet_id,
        }
    }
}

#[async_trait]
impl ManagedResource for Consultation {
    fn store(stores: &ClinicStores) -> &Arc<dyn RecordStore<Self>> {
        &stores.consultations
    }

    async fn check_create(
        mut draft: NewConsultation,
        ctx: &RuleContext,
    ) -> Result<NewConsultation, Error> {
        draft.date = ctx
            .temporal()
            .evaluate(TemporalRule::After, "date", draft.date)?;
        Ok(draft)
    }

    async fn check_update(
        _existing: &Self,
        mut patch: ConsultationPatch,
        ctx: &RuleContext,
    ) -> Result<ConsultationPatch, Error> {
        patch.date = ctx
            .temporal()
            .evaluate_present(TemporalRule::After, "date", patch.date)?;
        if let Some(pet_id) = patch.pet_id {
            ctx.require_pet(pet_id).await?;
        }
        Ok(patch)
    }
}
