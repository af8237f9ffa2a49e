//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email.
        Conflict { email: String } => "user repository conflict on email {email}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Every registered user.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Store a new account and return it with its assigned id.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Replace a stored account; `None` when it no longer exists.
    async fn update(&self, user: &User) -> Result<Option<User>, UserPersistenceError>;

    /// Remove an account and return its last snapshot.
    async fn delete(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;
}
