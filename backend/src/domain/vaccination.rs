//! Vaccinations applied to a pet and filed on one of its cards.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::patch::define_patch;
use super::ports::RecordStore;
use super::rules::{ManagedResource, RuleContext};
use super::temporal::TemporalRule;
use super::{
    ClinicStores, Error, OwnerRef, PetId, Resource, ResourceKind, VaccinationId,
    VaccinationRecordId,
};

/// Decimal places kept for a pet's weight.
pub const WEIGHT_SCALE: u32 = 2;

/// Round a weight to [`WEIGHT_SCALE`] places, halves away from zero.
pub fn round_weight(weight: Decimal) -> Decimal {
    weight.round_dp_with_strategy(WEIGHT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vaccination {
    pub id: VaccinationId,
    pub name: String,
    /// UTC midnight of the day the vaccine was applied.
    pub application_date: DateTime<Utc>,
    pub weight: Decimal,
    pub pet_id: PetId,
    pub vaccination_record_id: VaccinationRecordId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVaccination {
    pub name: String,
    pub application_date: DateTime<Utc>,
    pub weight: Decimal,
    pub pet_id: PetId,
    pub vaccination_record_id: VaccinationRecordId,
}

define_patch! {
    pub struct VaccinationPatch for Vaccination {
        name: String,
        application_date: DateTime<Utc>,
        weight: Decimal,
        pet_id: PetId,
        vaccination_record_id: VaccinationRecordId,
    }
}

impl Resource for Vaccination {
    type Id = VaccinationId;
    type Draft = NewVaccination;
    type Patch = VaccinationPatch;

    const KIND: ResourceKind = ResourceKind::Vaccination;

    fn id(&self) -> VaccinationId {
        self.id
    }

    fn owner(&self) -> OwnerRef {
        OwnerRef::Pet(self.pet_id)
    }

    fn draft_owner(draft: &NewVaccination) -> OwnerRef {
        OwnerRef::Pet(draft.pet_id)
    }

    fn from_draft(id: VaccinationId, draft: NewVaccination) -> Self {
        Self {
            id,
            name: draft.name,
            application_date: draft.application_date,
            weight: draft.weight,
            pet_id: draft.pet_id,
            vaccination_record_id: draft.vaccination_record_id,
        }
    }
}

#[async_trait]
impl ManagedResource for Vaccination {
    fn store(stores: &ClinicStores) -> &Arc<dyn RecordStore<Self>> {
        &stores.vaccinations
    }

    async fn check_create(
        mut draft: NewVaccination,
        ctx: &RuleContext,
    ) -> Result<NewVaccination, Error> {
        draft.application_date = ctx.temporal().evaluate(
            TemporalRule::SameUtcDay,
            "applicationDate",
            draft.application_date,
        )?;
        ctx.require_vaccination_record(draft.vaccination_record_id)
            .await?;
        draft.weight = round_weight(draft.weight);
        Ok(draft)
    }

    async fn check_update(
        _existing: &Self,
        mut patch: VaccinationPatch,
        ctx: &RuleContext,
    ) -> Result<VaccinationPatch, Error> {
        patch.application_date = ctx.temporal().evaluate_present(
            TemporalRule::SameUtcDay,
            "applicationDate",
            patch.application_date,
        )?;
        if let Some(pet_id) = patch.pet_id {
            ctx.require_pet(pet_id).await?;
        }
        if let Some(record_id) = patch.vaccination_record_id {
            ctx.require_vaccination_record(record_id).await?;
        }
        patch.weight = patch.weight.map(round_weight);
        Ok(patch)
    }
}
