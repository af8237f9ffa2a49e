//! Walks a record's reference chain to its owning user.

use super::stores::map_store_error;
use super::{ClinicStores, Error, OwnerRef, ResourceKind, UserId};

/// Resolves the user who owns a record.
///
/// Pets name their owner directly; every other record reaches its owner
/// through the pet it references, which must exist.
#[derive(Clone, Copy)]
pub struct OwnershipResolver<'a> {
    stores: &'a ClinicStores,
}

impl<'a> OwnershipResolver<'a> {
    pub fn new(stores: &'a ClinicStores) -> Self {
        Self { stores }
    }

    pub async fn resolve(&self, reference: OwnerRef) -> Result<UserId, Error> {
        match reference {
            OwnerRef::User(owner) => Ok(owner),
            OwnerRef::Pet(pet_id) => self
                .stores
                .pets
                .find_by_id(pet_id)
                .await
                .map_err(|err| map_store_error(ResourceKind::Pet, err))?
                .map(|pet| pet.owner_id)
                .ok_or_else(|| Error::record_not_found(ResourceKind::Pet, pet_id)),
        }
    }
}
