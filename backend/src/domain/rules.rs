//! Per-kind hooks the record pipeline runs before persisting a write.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::eligibility::VaccinationEligibilityEngine;
use super::ports::RecordStore;
use super::stores::{map_store_error, map_user_error};
use super::temporal::TemporalRuleEvaluator;
use super::{
    ClinicStores, Error, Pet, PetId, Resource, ResourceKind, User, UserId, VaccinationRecord,
    VaccinationRecordId,
};

/// State shared by the rule hooks of a single write.
pub struct RuleContext {
    stores: ClinicStores,
    temporal: TemporalRuleEvaluator,
}

impl RuleContext {
    pub fn new(stores: ClinicStores, now: DateTime<Utc>) -> Self {
        Self {
            stores,
            temporal: TemporalRuleEvaluator::new(now),
        }
    }

    pub fn temporal(&self) -> &TemporalRuleEvaluator {
        &self.temporal
    }

    /// UTC calendar day of the write.
    pub fn today(&self) -> NaiveDate {
        self.temporal.now().date_naive()
    }

    pub fn eligibility(&self) -> VaccinationEligibilityEngine<'_> {
        VaccinationEligibilityEngine::new(self.stores.vaccination_records.as_ref())
    }

    /// Load a referenced pet, reporting its absence as `NotFound`.
    pub async fn require_pet(&self, id: PetId) -> Result<Pet, Error> {
        self.stores
            .pets
            .find_by_id(id)
            .await
            .map_err(|err| map_store_error(ResourceKind::Pet, err))?
            .ok_or_else(|| Error::record_not_found(ResourceKind::Pet, id))
    }

    /// Load a referenced user, reporting its absence as `NotFound`.
    pub async fn require_user(&self, id: UserId) -> Result<User, Error> {
        self.stores
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::record_not_found(ResourceKind::User, id))
    }

    /// Load a referenced vaccination card, reporting its absence as `NotFound`.
    pub async fn require_vaccination_record(
        &self,
        id: VaccinationRecordId,
    ) -> Result<VaccinationRecord, Error> {
        self.stores
            .vaccination_records
            .find_by_id(id)
            .await
            .map_err(|err| map_store_error(ResourceKind::VaccinationRecord, err))?
            .ok_or_else(|| Error::record_not_found(ResourceKind::VaccinationRecord, id))
    }
}

/// A record kind the pipeline can create, read, update and delete.
///
/// The hooks may normalise the values they receive (for example truncating a
/// date to midnight); what they return is what gets stored.
#[async_trait]
pub trait ManagedResource: Resource {
    /// Store handle for this kind.
    fn store(stores: &ClinicStores) -> &Arc<dyn RecordStore<Self>>;

    /// Temporal, reference and eligibility checks for a new record.
    async fn check_create(draft: Self::Draft, ctx: &RuleContext) -> Result<Self::Draft, Error>;

    /// The same checks, limited to the fields present in `patch`.
    async fn check_update(
        existing: &Self,
        patch: Self::Patch,
        ctx: &RuleContext,
    ) -> Result<Self::Patch, Error>;
}
