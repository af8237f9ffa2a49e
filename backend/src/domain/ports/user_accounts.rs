//! Driving port for account management.

use async_trait::async_trait;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::{Envelope, Error, Principal, Role, User, UserId};

/// Registration payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: Zeroizing<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Partial account update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<Zeroizing<String>>,
    pub role: Option<Role>,
}

/// Account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    async fn register(&self, request: RegisterUser) -> Result<Envelope<User>, Error>;

    async fn list(&self, principal: &Principal) -> Result<Envelope<Vec<User>>, Error>;

    async fn get(&self, id: UserId, principal: &Principal) -> Result<Envelope<User>, Error>;

    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
        principal: &Principal,
    ) -> Result<Envelope<User>, Error>;

    async fn delete(&self, id: UserId, principal: &Principal) -> Result<Envelope<User>, Error>;
}
