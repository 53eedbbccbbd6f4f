//! Caller identity carried in the encrypted session cookie.
//!
//! Handlers never touch `actix_session` directly; they ask [`SessionContext`]
//! for the signed-in [`UserId`] and hand it to the domain explicitly.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Identity view over the actix session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind `user_id` to a fresh session id.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|err| Error::internal(format!("session write failed: {err}")))
    }

    /// Forget the caller and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// The signed-in user, if any. An unparsable stored id counts as
    /// signed out.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let stored = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|err| Error::internal(format!("session read failed: {err}")))?;
        Ok(stored.and_then(|raw| {
            raw.parse::<UserId>()
                .inspect_err(|err| warn!(error = %err, "discarding malformed session user id"))
                .ok()
        }))
    }

    /// The signed-in user, or `401 login required`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move { session.await.map(Self::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use crate::inbound::http::test_utils::test_session_middleware;

    const FIXTURE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    async fn sign_in(session: SessionContext) -> Result<HttpResponse, Error> {
        let id: UserId = FIXTURE_ID.parse().expect("fixture id");
        session.persist_user(id)?;
        Ok(HttpResponse::Ok().finish())
    }

    async fn store_garbage(session: Session) -> HttpResponse {
        session
            .insert(USER_ID_KEY, "not-a-uuid")
            .expect("insert raw value");
        HttpResponse::Ok().finish()
    }

    async fn sign_out(session: SessionContext) -> HttpResponse {
        session.clear();
        HttpResponse::NoContent().finish()
    }

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let id = session.require_user_id()?;
        Ok(HttpResponse::Ok().body(id.to_string()))
    }

    macro_rules! session_app {
        () => {
            test::init_service(
                App::new()
                    .wrap(test_session_middleware())
                    .route("/sign-in", web::post().to(sign_in))
                    .route("/garbage", web::post().to(store_garbage))
                    .route("/sign-out", web::post().to(sign_out))
                    .route("/whoami", web::get().to(whoami)),
            )
            .await
        };
    }

    fn session_cookie(res: &actix_web::dev::ServiceResponse) -> Option<Cookie<'static>> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(Cookie::into_owned)
    }

    #[actix_web::test]
    async fn signed_in_user_round_trips() {
        let app = session_app!();
        let res = test::call_service(&app, test::TestRequest::post().uri("/sign-in").to_request())
            .await;
        let cookie = session_cookie(&res).expect("session cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, FIXTURE_ID);
    }

    #[rstest]
    #[case::no_cookie(None)]
    #[case::malformed_id(Some("/garbage"))]
    #[actix_web::test]
    async fn unidentified_callers_are_unauthorised(#[case] setup: Option<&str>) {
        let app = session_app!();
        let mut request = test::TestRequest::get().uri("/whoami");
        if let Some(uri) = setup {
            let res =
                test::call_service(&app, test::TestRequest::post().uri(uri).to_request()).await;
            request = request.cookie(session_cookie(&res).expect("session cookie"));
        }

        let res = test::call_service(&app, request.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn sign_out_expires_the_cookie() {
        let app = session_app!();
        let res = test::call_service(&app, test::TestRequest::post().uri("/sign-in").to_request())
            .await;
        let cookie = session_cookie(&res).expect("session cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/sign-out")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let removal = session_cookie(&res).expect("removal cookie");
        assert!(removal.value().is_empty());
    }
}
