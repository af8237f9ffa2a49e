//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};

use crate::domain::ports::{PasswordHasher, UserRepository};
use crate::domain::{NewUser, Role, User};
use crate::outbound::credentials::Argon2PasswordHasher;
use crate::outbound::persistence::MemoryStore;
use crate::test_support::{FixedClock, clinic_now};

use super::state::HttpState;

pub const PASSWORD: &str = "s3cret-pass";

/// Build a session middleware configured for tests.
///
/// Uses a fresh key per invocation, names the cookie `session` and disables
/// the `Secure` flag for plain HTTP.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Memory-backed handler state frozen at the clinic fixture instant.
pub fn memory_state() -> (Arc<MemoryStore>, HttpState) {
    let store = Arc::new(MemoryStore::new());
    let state = HttpState::for_backend(
        store.clone(),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(FixedClock(clinic_now())),
    );
    (store, state)
}

/// Store an account whose password is [`PASSWORD`].
pub async fn seed_user(store: &MemoryStore, email: &str, role: Role) -> User {
    let password_hash = Argon2PasswordHasher::new()
        .hash(PASSWORD)
        .expect("hash fixture password");
    UserRepository::create(
        store,
        &NewUser {
            name: "Fixture".into(),
            email: email.into(),
            password_hash,
            role,
        },
    )
    .await
    .expect("seed user")
}

/// Initialise the full `/api/v1` surface over `state`.
pub async fn init_api(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(crate::Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(test_session_middleware())
                    .configure(super::configure_api),
            ),
    )
    .await
}

/// Log in and return the session cookie.
pub async fn login<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed for {email}");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Issue an authenticated request and return the status and JSON body.
pub async fn send<S>(
    app: &S,
    request: actix_test::TestRequest,
    cookie: &Cookie<'static>,
) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response =
        actix_test::call_service(app, request.cookie(cookie.clone()).to_request()).await;
    let status = response.status().as_u16();
    let bytes = actix_test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}
