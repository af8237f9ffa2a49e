//! Handles to every persistence port the clinic core reads or writes.

use std::sync::Arc;

use super::ports::{RecordStore, RecordStoreError, UserPersistenceError, UserRepository};
use super::{
    Activity, Consultation, Error, Pet, ResourceKind, Treatment, Vaccination, VaccinationRecord,
};

/// Shared store handles, one per record kind.
#[derive(Clone)]
pub struct ClinicStores {
    pub users: Arc<dyn UserRepository>,
    pub pets: Arc<dyn RecordStore<Pet>>,
    pub activities: Arc<dyn RecordStore<Activity>>,
    pub consultations: Arc<dyn RecordStore<Consultation>>,
    pub treatments: Arc<dyn RecordStore<Treatment>>,
    pub vaccination_records: Arc<dyn RecordStore<VaccinationRecord>>,
    pub vaccinations: Arc<dyn RecordStore<Vaccination>>,
}

impl ClinicStores {
    /// Wire every port to a single backend implementing all of them.
    pub fn from_backend<S>(backend: Arc<S>) -> Self
    where
        S: UserRepository
            + RecordStore<Pet>
            + RecordStore<Activity>
            + RecordStore<Consultation>
            + RecordStore<Treatment>
            + RecordStore<VaccinationRecord>
            + RecordStore<Vaccination>
            + 'static,
    {
        Self {
            users: backend.clone(),
            pets: backend.clone(),
            activities: backend.clone(),
            consultations: backend.clone(),
            treatments: backend.clone(),
            vaccination_records: backend.clone(),
            vaccinations: backend,
        }
    }
}

/// Translate a record store failure into the domain error for `kind`.
pub fn map_store_error(kind: ResourceKind, error: RecordStoreError) -> Error {
    match error {
        RecordStoreError::Connection { message } => {
            Error::service_unavailable(format!("{} store unavailable: {message}", kind.label()))
        }
        RecordStoreError::Query { message } => {
            Error::internal(format!("{} store error: {message}", kind.label()))
        }
        RecordStoreError::Conflict { key } => Error::duplicate(kind, key),
    }
}

/// Translate a user repository failure into a domain error.
pub fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Conflict { email } => Error::duplicate(ResourceKind::User, email),
    }
}
