//! Port for persisting clinic records of any kind.

use async_trait::async_trait;

use crate::domain::{PetId, Resource, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by record store adapters.
    pub enum RecordStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "record store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "record store query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { key: String } => "record store conflict on {key}",
    }
}

/// Selection applied by [`RecordStore::find_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFilter {
    /// Every record of the kind.
    All,
    /// Records transitively owned by the user.
    OwnedBy(UserId),
    /// Records attached to the pet.
    ForPet(PetId),
}

/// Lookup, insert, update and delete primitives for one record kind.
///
/// Adapters assign identifiers on `create` and must reject a write that
/// breaks [`Resource::unique_key`] with [`RecordStoreError::Conflict`].
#[async_trait]
pub trait RecordStore<R: Resource>: Send + Sync {
    async fn find_by_id(&self, id: R::Id) -> Result<Option<R>, RecordStoreError>;

    async fn find_by(&self, filter: RecordFilter) -> Result<Vec<R>, RecordStoreError>;

    async fn create(&self, draft: &R::Draft) -> Result<R, RecordStoreError>;

    /// Replace the stored record; `None` when it no longer exists.
    async fn update(&self, record: &R) -> Result<Option<R>, RecordStoreError>;

    /// Remove the record and return its last snapshot.
    async fn delete(&self, id: R::Id) -> Result<Option<R>, RecordStoreError>;
}
