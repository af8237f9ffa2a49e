//! Driving ports for authentication.
//!
//! Inbound adapters call these to turn credentials or a session into a
//! [`Principal`] without importing the backing infrastructure, so HTTP
//! handler tests can substitute a test double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Principal, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated principal.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error>;
}

/// Resolves the principal behind an established session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    /// Load the current role for `user_id`; a vanished account is `Unauthorized`.
    async fn resolve(&self, user_id: UserId) -> Result<Principal, Error>;
}
