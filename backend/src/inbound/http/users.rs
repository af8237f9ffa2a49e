//! Account and session API handlers.
//!
//! ```text
//! POST   /api/v1/login            {"email":"ana@clinic.mx","password":"..."}
//! POST   /api/v1/logout
//! POST   /api/v1/users/register   {"name":"Ana","email":"ana@clinic.mx","password":"..."}
//! GET    /api/v1/users
//! GET    /api/v1/users/{id}
//! PUT    /api/v1/users/{id}       {"name":"Ana María"}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::{RegisterUser, UserChanges};
use crate::domain::{
    ApiResult, Error, LoginCredentials, LoginValidationError, Role, UserId,
};

use super::session::SessionContext;
use super::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Summary of the account a session was opened for.
#[derive(Debug, Serialize)]
pub struct LoggedInUser {
    pub id: UserId,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: LoggedInUser,
}

/// Authenticate and establish a session.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let principal = state.login.authenticate(&credentials).await?;
    session.persist_user(principal.id)?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "login successful",
        user: LoggedInUser {
            id: principal.id,
            role: principal.role,
        },
    }))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Drop the session cookie.
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::Ok().json(json!({ "message": "logged out" }))
}

/// Open registration; the new account defaults to the `USER` role.
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUser>,
) -> ApiResult<HttpResponse> {
    let envelope = state.accounts.register(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(envelope))
}

#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let principal = state.principal(&session).await?;
    let envelope = state.accounts.list(&principal).await?;
    Ok(HttpResponse::Ok().json(envelope))
}

#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let principal = state.principal(&session).await?;
    let envelope = state
        .accounts
        .get(UserId::new(path.into_inner()), &principal)
        .await?;
    Ok(HttpResponse::Ok().json(envelope))
}

#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    changes: web::Json<UserChanges>,
) -> ApiResult<HttpResponse> {
    let principal = state.principal(&session).await?;
    let envelope = state
        .accounts
        .update(UserId::new(path.into_inner()), changes.into_inner(), &principal)
        .await?;
    Ok(HttpResponse::Ok().json(envelope))
}

#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let principal = state.principal(&session).await?;
    let envelope = state
        .accounts
        .delete(UserId::new(path.into_inner()), &principal)
        .await?;
    Ok(HttpResponse::Ok().json(envelope))
}

/// Register the account and session routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(logout)
        .service(register)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user);
}
