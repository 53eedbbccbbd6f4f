//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use crate::domain::{
    AccountService, RideAnalyticsService, RideLifecycleService, RideSearchService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryRideRepository, InMemoryUserRepository};
use crate::outbound::security::BcryptPasswordHasher;

/// Lowest cost bcrypt accepts; keeps handler tests fast.
const TEST_BCRYPT_COST: u32 = 4;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Services wired to fresh in-memory adapters.
pub fn memory_state() -> HttpState {
    let users = Arc::new(InMemoryUserRepository::new());
    let rides = Arc::new(InMemoryRideRepository::new());
    let hasher = Arc::new(BcryptPasswordHasher::new(TEST_BCRYPT_COST));
    HttpState::new(
        Arc::new(AccountService::new(users.clone(), hasher)),
        Arc::new(RideLifecycleService::new(
            users,
            rides.clone(),
            Arc::new(DefaultClock),
        )),
        Arc::new(RideSearchService::new(rides.clone())),
        Arc::new(RideAnalyticsService::new(rides)),
    )
}

/// Every HTTP route over `state`, behind a test session middleware.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(test_session_middleware())
        .app_data(web::Data::new(state))
        .configure(super::configure)
}

/// Register an account, log in and return the session cookie with the user
/// payload.
pub async fn register_and_login<S, B>(
    app: &S,
    username: &str,
    role: &str,
) -> (Cookie<'static>, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let body = json!({"username": username, "password": "s3cretpass", "role": role});
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "register {username}: {}", res.status());

    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": username, "password": "s3cretpass"}))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login {username}: {}", res.status());
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned();
    let user: Value = test::read_body_json(res).await;
    (cookie, user)
}
