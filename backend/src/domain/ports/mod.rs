//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod password_hasher;
mod record_store;
mod user_accounts;
mod user_repository;

#[cfg(test)]
pub use login_service::{MockLoginService, MockPrincipalResolver};
pub use login_service::{LoginService, PrincipalResolver};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use record_store::{RecordFilter, RecordStore, RecordStoreError};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::{RegisterUser, UserAccounts, UserChanges};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
