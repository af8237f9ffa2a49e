//! Vaccination cards. A pet holds at most one card of each type.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::patch::define_patch;
use super::ports::RecordStore;
use super::rules::{ManagedResource, RuleContext};
use super::{ClinicStores, Error, OwnerRef, PetId, Resource, ResourceKind, VaccinationRecordId};

/// Card type; which ones a pet may hold depends on its species and age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Adulto,
    Cachorro,
    Gatito,
}

impl RecordType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adulto => "adulto",
            Self::Cachorro => "cachorro",
            Self::Gatito => "gatito",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored card type is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown record type: {0}")]
pub struct UnknownRecordType(pub String);

impl FromStr for RecordType {
    type Err = UnknownRecordType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "adulto" => Ok(Self::Adulto),
            "cachorro" => Ok(Self::Cachorro),
            "gatito" => Ok(Self::Gatito),
            other => Err(UnknownRecordType(other.to_owned())),
        }
    }
}

/// Uniqueness key of the card `record_type` held by `pet_id`.
pub fn record_key(pet_id: PetId, record_type: RecordType) -> String {
    format!("pet {pet_id}/{record_type}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationRecord {
    pub id: VaccinationRecordId,
    pub record_type: RecordType,
    pub pet_id: PetId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVaccinationRecord {
    pub record_type: RecordType,
    pub pet_id: PetId,
}

define_patch! {
    pub struct VaccinationRecordPatch for VaccinationRecord {
        record_type: RecordType,
        pet_id: PetId,
    }
}

impl Resource for VaccinationRecord {
    type Id = VaccinationRecordId;
    type Draft = NewVaccinationRecord;
    type Patch = VaccinationRecordPatch;

    const KIND: ResourceKind = ResourceKind::VaccinationRecord;

    fn id(&self) -> VaccinationRecordId {
        self.id
    }

    fn owner(&self) -> OwnerRef {
        OwnerRef::Pet(self.pet_id)
    }

    fn draft_owner(draft: &NewVaccinationRecord) -> OwnerRef {
        OwnerRef::Pet(draft.pet_id)
    }

    fn from_draft(id: VaccinationRecordId, draft: NewVaccinationRecord) -> Self {
        Self {
            id,
            record_type: draft.record_type,
            pet_id: draft.pet_id,
        }
    }

    fn unique_key(&self) -> Option<String> {
        Some(record_key(self.pet_id, self.record_type))
    }
}

#[async_trait]
impl ManagedResource for VaccinationRecord {
    fn store(stores: &ClinicStores) -> &Arc<dyn RecordStore<Self>> {
        &stores.vaccination_records
    }

    async fn check_create(
        draft: NewVaccinationRecord,
        ctx: &RuleContext,
    ) -> Result<NewVaccinationRecord, Error> {
        let pet = ctx.require_pet(draft.pet_id).await?;
        ctx.eligibility()
            .ensure_eligible(&pet, draft.record_type, ctx.today())
            .await?;
        Ok(draft)
    }

    /// Re-checks eligibility against the target pet whenever the card type or
    /// pet changes. The card itself is not excluded from the uniqueness check.
    async fn check_update(
        existing: &Self,
        patch: VaccinationRecordPatch,
        ctx: &RuleContext,
    ) -> Result<VaccinationRecordPatch, Error> {
        if patch.record_type.is_none() && patch.pet_id.is_none() {
            return Ok(patch);
        }
        let pet = ctx
            .require_pet(patch.pet_id.unwrap_or(existing.pet_id))
            .await?;
        let record_type = patch.record_type.unwrap_or(existing.record_type);
        ctx.eligibility()
            .ensure_eligible(&pet, record_type, ctx.today())
            .await?;
        Ok(patch)
    }
}
