//! Account registration and management.
//!
//! Implements the [`UserAccounts`] driving port. Accounts are visible to
//! administrators and to their own holder only.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::access_policy::AccessPolicy;
use super::ports::{
    PasswordHashError, PasswordHasher, RegisterUser, UserAccounts, UserChanges, UserRepository,
};
use super::stores::map_user_error;
use super::{
    Envelope, Error, NewUser, Principal, ResourceKind, Role, User, UserId, is_valid_email,
};

/// Account service backed by a user repository and a password hasher.
#[derive(Clone)]
pub struct UserAccountsService<U: ?Sized, H: ?Sized> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U: ?Sized, H: ?Sized> UserAccountsService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

fn ensure_email_shape(email: &str) -> Result<(), Error> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(Error::invalid_field("email", "must look like name@domain.tld"))
    }
}

impl<U, H> UserAccountsService<U, H>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    async fn ensure_email_free(&self, email: &str, owner: Option<UserId>) -> Result<(), Error> {
        let holder = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_error)?;
        match holder {
            Some(user) if Some(user.id) != owner => {
                Err(Error::duplicate(ResourceKind::User, email))
            }
            _ => Ok(()),
        }
    }

    async fn load(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::record_not_found(ResourceKind::User, id))
    }

    /// Create an administrator unless the email is already registered.
    ///
    /// Returns the new account, or `None` when the email was taken.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<Option<User>, Error> {
        if self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Ok(None);
        }
        let request = RegisterUser {
            name: "Administrator".to_owned(),
            email: email.to_owned(),
            password: password.to_owned().into(),
            role: Some(Role::Admin),
        };
        self.create_account(request, Role::Admin).await.map(Some)
    }

    async fn create_account(&self, request: RegisterUser, role: Role) -> Result<User, Error> {
        ensure_email_shape(&request.email)?;
        self.ensure_email_free(&request.email, None).await?;
        let password_hash = self
            .hasher
            .hash(request.password.as_str())
            .map_err(map_hash_error)?;
        let user = self
            .users
            .create(&NewUser {
                name: request.name,
                email: request.email,
                password_hash,
                role,
            })
            .await
            .map_err(map_user_error)?;
        info!(user = %user.id, role = %user.role, "user registered");
        Ok(user)
    }
}

#[async_trait]
impl<U, H> UserAccounts for UserAccountsService<U, H>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    /// Open registration only ever creates `USER` accounts; administrators
    /// come from bootstrap or from an admin's role change.
    async fn register(&self, request: RegisterUser) -> Result<Envelope<User>, Error> {
        if request.role == Some(Role::Admin) {
            warn!(email = %request.email, "anonymous registration asked for ADMIN");
            return Err(Error::forbidden("only administrators may assign roles"));
        }
        let user = self.create_account(request, Role::User).await?;
        Ok(Envelope::created(ResourceKind::User, user))
    }

    async fn list(&self, principal: &Principal) -> Result<Envelope<Vec<User>>, Error> {
        if !principal.is_admin() {
            return Err(Error::forbidden("only administrators may list users"));
        }
        let users = self.users.list().await.map_err(map_user_error)?;
        Ok(Envelope::listed(ResourceKind::User, users))
    }

    async fn get(&self, id: UserId, principal: &Principal) -> Result<Envelope<User>, Error> {
        AccessPolicy.ensure(principal, id, ResourceKind::User)?;
        let user = self.load(id).await?;
        Ok(Envelope::found(ResourceKind::User, user))
    }

    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
        principal: &Principal,
    ) -> Result<Envelope<User>, Error> {
        AccessPolicy.ensure(principal, id, ResourceKind::User)?;
        if changes.role.is_some() && !principal.is_admin() {
            return Err(Error::forbidden("only administrators may change roles"));
        }
        let mut user = self.load(id).await?;
        if let Some(email) = changes.email {
            ensure_email_shape(&email)?;
            self.ensure_email_free(&email, Some(id)).await?;
            user.email = email;
        }
        if let Some(password) = changes.password {
            user.password_hash = self
                .hasher
                .hash(password.as_str())
                .map_err(map_hash_error)?;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        let updated = self
            .users
            .update(&user)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::record_not_found(ResourceKind::User, id))?;
        Ok(Envelope::updated(ResourceKind::User, updated))
    }

    async fn delete(&self, id: UserId, principal: &Principal) -> Result<Envelope<User>, Error> {
        AccessPolicy.ensure(principal, id, ResourceKind::User)?;
        let deleted = self
            .users
            .delete(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::record_not_found(ResourceKind::User, id))?;
        info!(user = %id, principal = %principal.id, "user deleted");
        Ok(Envelope::deleted(ResourceKind::User, deleted))
    }
}

#[cfg(test)]
#[path = "user_accounts_service_tests.rs"]
mod tests;
