//! Builders wiring the storage backend into the HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use crate::domain::ports::{PasswordHasher, RecordStore, UserRepository};
use crate::domain::{
    Activity, Consultation, Error, Pet, Treatment, UserAccountsService, Vaccination,
    VaccinationRecord,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::credentials::Argon2PasswordHasher;
use crate::outbound::persistence::{DieselStore, MemoryStore};

use super::ServerConfig;

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over a fresh in-memory store. Creates the bootstrap administrator first.
pub(crate) async fn build_http_state(config: &ServerConfig) -> Result<HttpState, Error> {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL record store");
            let store = Arc::new(DieselStore::new(pool.clone()));
            wire(store, hasher, clock, config.bootstrap_admin.as_ref()).await
        }
        None => {
            warn!("no database configured; records live in memory only");
            let store = Arc::new(MemoryStore::new());
            wire(store, hasher, clock, config.bootstrap_admin.as_ref()).await
        }
    }
}

async fn wire<S>(
    store: Arc<S>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
    bootstrap_admin: Option<&(String, String)>,
) -> Result<HttpState, Error>
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
    if let Some((email, password)) = bootstrap_admin {
        let accounts = UserAccountsService::new(store.clone(), hasher.clone());
        match accounts.ensure_admin(email, password).await? {
            Some(admin) => info!(user = %admin.id, "bootstrap administrator created"),
            None => info!("bootstrap administrator already registered"),
        }
    }
    Ok(HttpState::for_backend(store, hasher, clock))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use actix_web::cookie::{Key, SameSite};
    use rstest::{fixture, rstest};

    use crate::domain::ports::LoginService;
    use crate::domain::{LoginCredentials, Role};

    #[fixture]
    fn config() -> ServerConfig {
        let addr: SocketAddr = "127.0.0.1:0".parse().expect("socket address");
        ServerConfig::new(Key::generate(), false, SameSite::Lax, addr)
    }

    #[rstest]
    #[tokio::test]
    async fn bootstrap_admin_can_log_in(config: ServerConfig) {
        let config = config.with_bootstrap_admin("vet@clinic.mx", "changeme");

        let state = build_http_state(&config).await.expect("state builds");
        let credentials =
            LoginCredentials::try_from_parts("vet@clinic.mx", "changeme").expect("credentials");
        let principal = state
            .login
            .authenticate(&credentials)
            .await
            .expect("admin authenticates");

        assert_eq!(principal.role, Role::Admin);
    }

    #[rstest]
    #[tokio::test]
    async fn memory_state_starts_without_accounts(config: ServerConfig) {
        let state = build_http_state(&config).await.expect("state builds");
        let credentials =
            LoginCredentials::try_from_parts("vet@clinic.mx", "changeme").expect("credentials");

        let err = state
            .login
            .authenticate(&credentials)
            .await
            .expect_err("no accounts yet");
        assert_eq!(err.code(), crate::domain::ErrorCode::Unauthorized);
    }
}
