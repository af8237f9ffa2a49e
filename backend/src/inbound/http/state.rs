//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and the record pipeline, and stay testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    LoginService, PasswordHasher, PrincipalResolver, RecordStore, UserAccounts, UserRepository,
};
use crate::domain::{
    Activity, AuthService, ClinicStores, Consultation, Error, Pet, Principal,
    RecordMutationPipeline, Treatment, UserAccountsService, Vaccination, VaccinationRecord,
};

use super::session::SessionContext;

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub records: RecordMutationPipeline,
    pub accounts: Arc<dyn UserAccounts>,
    pub login: Arc<dyn LoginService>,
    pub principals: Arc<dyn PrincipalResolver>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub records: RecordMutationPipeline,
    pub accounts: Arc<dyn UserAccounts>,
    pub login: Arc<dyn LoginService>,
    pub principals: Arc<dyn PrincipalResolver>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            records,
            accounts,
            login,
            principals,
        } = ports;
        Self {
            records,
            accounts,
            login,
            principals,
        }
    }

    /// Wire every service to one storage backend.
    pub fn for_backend<S>(
        backend: Arc<S>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self
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
        let stores = ClinicStores::from_backend(backend);
        let users = stores.users.clone();
        let auth = Arc::new(AuthService::new(users.clone(), hasher.clone()));
        Self::new(HttpStatePorts {
            records: RecordMutationPipeline::new(stores, clock),
            accounts: Arc::new(UserAccountsService::new(users, hasher)),
            login: auth.clone(),
            principals: auth,
        })
    }

    /// Resolve the caller behind the session cookie.
    pub async fn principal(&self, session: &SessionContext) -> Result<Principal, Error> {
        let user_id = session.require_user_id()?;
        self.principals.resolve(user_id).await
    }
}
