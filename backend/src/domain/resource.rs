//! The shape every clinic record kind shares.

use std::fmt;

use serde::Serialize;

use super::patch::Patch;
use super::{PetId, ResourceKind, UserId};

/// What an entity points at when ownership is resolved.
///
/// Pets reference their owner directly; every dependent record references
/// the pet it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerRef {
    User(UserId),
    Pet(PetId),
}

/// A persisted clinic record.
pub trait Resource: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    type Id: Copy
        + Eq
        + Ord
        + fmt::Debug
        + fmt::Display
        + From<i64>
        + Into<i64>
        + Send
        + Sync
        + 'static;
    /// Payload for a record that has not been stored yet.
    type Draft: Clone + fmt::Debug + Send + Sync + 'static;
    type Patch: Patch<Self> + fmt::Debug + Send + Sync + 'static;

    const KIND: ResourceKind;

    fn id(&self) -> Self::Id;

    /// Reference followed to find the owning user of a stored record.
    fn owner(&self) -> OwnerRef;

    /// Reference followed to find the owning user of a draft.
    fn draft_owner(draft: &Self::Draft) -> OwnerRef;

    /// Materialise a draft under a store-assigned identifier.
    fn from_draft(id: Self::Id, draft: Self::Draft) -> Self;

    /// Key that must be unique across all records of this kind, if any.
    fn unique_key(&self) -> Option<String> {
        None
    }
}
