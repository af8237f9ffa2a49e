//! Scheduled pet activities such as walks or grooming.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patch::define_patch;
use super::ports::RecordStore;
use super::rules::{ManagedResource, RuleContext};
use super::temporal::TemporalRule;
use super::{ActivityId, ClinicStores, Error, OwnerRef, PetId, Resource, ResourceKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub activity_type: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub pet_id: PetId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub activity_type: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub pet_id: PetId,
}

define_patch! {
    pub struct ActivityPatch for Activity {
        activity_type: String,
        description: String,
        date: DateTime<Utc>,
        pet_id: PetId,
    }
}

impl Resource for Activity {
    type Id = ActivityId;
    type Draft = NewActivity;
    type Patch = ActivityPatch;

    const KIND: ResourceKind = ResourceKind::Activity;

    fn id(&self) -> ActivityId {
        self.id
    }

    fn owner(&self) -> OwnerRef {
        OwnerRef::Pet(self.pet_id)
    }

    fn draft_owner(draft: &NewActivity) -> OwnerRef {
        OwnerRef::Pet(draft.pet_id)
    }

    fn from_draft(id: ActivityId, draft: NewActivity) -> Self {
        Self {
            id,
            activity_type: draft.activity_type,
            description: draft.description,
            date: draft.date,
            pet_id: draft.pet_id,
        }
    }
}

#[async_trait]
impl ManagedResource for Activity {
    fn store(stores: &ClinicStores) -> &Arc<dyn RecordStore<Self>> {
        &stores.activities
    }

    async fn check_create(mut draft: NewActivity, ctx: &RuleContext) -> Result<NewActivity, Error> {
        draft.date = ctx
            .temporal()
            .evaluate(TemporalRule::NotBefore, "date", draft.date)?;
        Ok(draft)
    }

    async fn check_update(
        _existing: &Self,
        mut patch: ActivityPatch,
        ctx: &RuleContext,
    ) -> Result<ActivityPatch, Error> {
        patch.date = ctx
            .temporal()
            .evaluate_present(TemporalRule::NotBefore, "date", patch.date)?;
        if let Some(pet_id) = patch.pet_id {
            ctx.require_pet(pet_id).await?;
        }
        Ok(patch)
    }
}
