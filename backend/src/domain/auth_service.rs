//! Credential checks and session principal lookup.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::ports::{
    LoginService, PasswordHashError, PasswordHasher, PrincipalResolver, UserRepository,
};
use super::stores::map_user_error;
use super::{Error, LoginCredentials, Principal, UserId};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Authenticates against the user repository and the password hasher.
#[derive(Clone)]
pub struct AuthService<U: ?Sized, H: ?Sized> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U: ?Sized, H: ?Sized> AuthService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl<U, H> LoginService for AuthService<U, H>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        match self.hasher.verify(credentials.password(), &user.password_hash) {
            Ok(true) => Ok(user.principal()),
            Ok(false) => Err(Error::unauthorized(INVALID_CREDENTIALS)),
            Err(PasswordHashError::Malformed { message }) => {
                warn!(user = %user.id, %message, "stored password hash is unusable");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
            Err(err) => {
                debug!(error = %err, "password verification failed");
                Err(Error::internal("password verification failed"))
            }
        }
    }
}

#[async_trait]
impl<U, H> PrincipalResolver for AuthService<U, H>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    async fn resolve(&self, user_id: UserId) -> Result<Principal, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .map(|user| user.principal())
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPasswordHasher, MockUserRepository};
    use crate::domain::{ErrorCode, Role, User};
    use rstest::rstest;

    fn ana() -> User {
        User {
            id: UserId::new(5),
            name: "Ana".into(),
            email: "ana@clinic.mx".into(),
            password_hash: "stored".into(),
            role: Role::Admin,
        }
    }

    fn service(
        users: MockUserRepository,
        hasher: MockPasswordHasher,
    ) -> AuthService<MockUserRepository, MockPasswordHasher> {
        AuthService::new(Arc::new(users), Arc::new(hasher))
    }

    fn credentials(password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts("ana@clinic.mx", password).expect("credentials shape")
    }

    #[rstest]
    #[case("right", true)]
    #[case("wrong", false)]
    #[tokio::test]
    async fn authenticate_compares_password(#[case] password: &str, #[case] should_succeed: bool) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(Some(ana())));
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .returning(|password, hash| Ok(password == "right" && hash == "stored"));

        let result = service(users, hasher)
            .authenticate(&credentials(password))
            .await;
        match (should_succeed, result) {
            (true, Ok(principal)) => {
                assert_eq!(principal, Principal::new(UserId::new(5), Role::Admin));
            }
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (true, Err(err)) => panic!("expected success, got error: {err:?}"),
            (false, Ok(principal)) => panic!("expected failure, got {principal:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().never();

        let err = service(users, hasher)
            .authenticate(&credentials("right"))
            .await
            .expect_err("unknown account");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn vanished_session_user_is_unauthorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));

        let err = service(users, MockPasswordHasher::new())
            .resolve(UserId::new(5))
            .await
            .expect_err("deleted account");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
