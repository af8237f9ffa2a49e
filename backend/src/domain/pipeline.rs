//! Uniform create/read/update/delete flows for every clinic record kind.
//!
//! Every operation resolves the owning user, asks the [`AccessPolicy`], runs
//! the kind's rule hooks and only then touches the store. The first failing
//! check aborts the operation; nothing is written before all checks pass.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use super::access_policy::AccessPolicy;
use super::ownership::OwnershipResolver;
use super::patch::{Patch, merge};
use super::ports::RecordFilter;
use super::rules::{ManagedResource, RuleContext};
use super::stores::map_store_error;
use super::{ClinicStores, Envelope, Error, Principal};

/// Orchestrates ownership, authorization and domain rules around the stores.
#[derive(Clone)]
pub struct RecordMutationPipeline {
    stores: ClinicStores,
    clock: Arc<dyn Clock>,
    policy: AccessPolicy,
}

impl RecordMutationPipeline {
    pub fn new(stores: ClinicStores, clock: Arc<dyn Clock>) -> Self {
        Self {
            stores,
            clock,
            policy: AccessPolicy,
        }
    }

    pub fn stores(&self) -> &ClinicStores {
        &self.stores
    }

    fn resolver(&self) -> OwnershipResolver<'_> {
        OwnershipResolver::new(&self.stores)
    }

    fn rule_context(&self) -> RuleContext {
        RuleContext::new(self.stores.clone(), self.clock.utc())
    }

    async fn load<R: ManagedResource>(&self, id: R::Id) -> Result<R, Error> {
        R::store(&self.stores)
            .find_by_id(id)
            .await
            .map_err(|err| map_store_error(R::KIND, err))?
            .ok_or_else(|| Error::record_not_found(R::KIND, id))
    }

    async fn authorize_existing<R: ManagedResource>(
        &self,
        record: &R,
        principal: &Principal,
    ) -> Result<(), Error> {
        let owner = self.resolver().resolve(record.owner()).await?;
        self.policy.ensure(principal, owner, R::KIND)
    }

    pub async fn create<R: ManagedResource>(
        &self,
        draft: R::Draft,
        principal: &Principal,
    ) -> Result<Envelope<R>, Error> {
        let owner = self.resolver().resolve(R::draft_owner(&draft)).await?;
        self.policy.ensure(principal, owner, R::KIND)?;
        let draft = R::check_create(draft, &self.rule_context()).await?;
        let created = R::store(&self.stores)
            .create(&draft)
            .await
            .map_err(|err| map_store_error(R::KIND, err))?;
        info!(kind = %R::KIND, id = %created.id(), principal = %principal.id, "record created");
        Ok(Envelope::created(R::KIND, created))
    }

    /// Existence is checked before ownership, so a missing id is `NotFound`
    /// for every caller.
    pub async fn read_one<R: ManagedResource>(
        &self,
        id: R::Id,
        principal: &Principal,
    ) -> Result<Envelope<R>, Error> {
        let record = self.load::<R>(id).await?;
        self.authorize_existing(&record, principal).await?;
        Ok(Envelope::found(R::KIND, record))
    }

    /// Administrators see every record; everyone else sees their own.
    pub async fn read_all<R: ManagedResource>(
        &self,
        principal: &Principal,
    ) -> Result<Envelope<Vec<R>>, Error> {
        let filter = if principal.is_admin() {
            RecordFilter::All
        } else {
            RecordFilter::OwnedBy(principal.id)
        };
        let records = R::store(&self.stores)
            .find_by(filter)
            .await
            .map_err(|err| map_store_error(R::KIND, err))?;
        Ok(Envelope::listed(R::KIND, records))
    }

    /// Ownership is resolved from the stored record, never from the patch.
    pub async fn update<R: ManagedResource>(
        &self,
        id: R::Id,
        patch: R::Patch,
        principal: &Principal,
    ) -> Result<Envelope<R>, Error> {
        let existing = self.load::<R>(id).await?;
        self.authorize_existing(&existing, principal).await?;
        if patch.is_empty() {
            return Ok(Envelope::updated(R::KIND, existing));
        }
        let patch = R::check_update(&existing, patch, &self.rule_context()).await?;
        let merged = merge(existing, patch);
        let updated = R::store(&self.stores)
            .update(&merged)
            .await
            .map_err(|err| map_store_error(R::KIND, err))?
            .ok_or_else(|| Error::record_not_found(R::KIND, id))?;
        info!(kind = %R::KIND, %id, principal = %principal.id, "record updated");
        Ok(Envelope::updated(R::KIND, updated))
    }

    /// Removes the record only; dependents of a deleted pet are left in place.
    pub async fn delete<R: ManagedResource>(
        &self,
        id: R::Id,
        principal: &Principal,
    ) -> Result<Envelope<R>, Error> {
        let existing = self.load::<R>(id).await?;
        self.authorize_existing(&existing, principal).await?;
        let deleted = R::store(&self.stores)
            .delete(id)
            .await
            .map_err(|err| map_store_error(R::KIND, err))?
            .ok_or_else(|| Error::record_not_found(R::KIND, id))?;
        info!(kind = %R::KIND, %id, principal = %principal.id, "record deleted");
        Ok(Envelope::deleted(R::KIND, deleted))
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
