//! End-to-end HTTP flows through the assembled application.

use std::sync::Arc;

use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use rideshare::domain::{
    AccountService, RideAnalyticsService, RideLifecycleService, RideSearchService,
};
use rideshare::inbound::http::health::HealthState;
use rideshare::inbound::http::state::HttpState;
use rideshare::outbound::memory::{InMemoryRideRepository, InMemoryUserRepository};
use rideshare::outbound::security::BcryptPasswordHasher;
use rideshare::server::{AppDependencies, build_app};

fn deps() -> AppDependencies {
    let users = Arc::new(InMemoryUserRepository::new());
    let rides = Arc::new(InMemoryRideRepository::new());
    let state = HttpState::new(
        Arc::new(AccountService::new(
            users.clone(),
            Arc::new(BcryptPasswordHasher::new(4)),
        )),
        Arc::new(RideLifecycleService::new(
            users,
            rides.clone(),
            Arc::new(DefaultClock),
        )),
        Arc::new(RideSearchService::new(rides.clone())),
        Arc::new(RideAnalyticsService::new(rides)),
    );
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(state),
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

macro_rules! call {
    ($app:expr, $req:expr) => {
        test::call_service(&$app, $req.to_request()).await
    };
}

macro_rules! session_for {
    ($app:expr, $name:expr, $role:expr) => {{
        let res = call!(
            $app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(json!({"username": $name, "password": "s3cretpass", "role": $role}))
        );
        assert_eq!(res.status(), StatusCode::CREATED);
        let res = call!(
            $app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"username": $name, "password": "s3cretpass"}))
        );
        assert_eq!(res.status(), StatusCode::OK);
        let cookie: Cookie<'static> = res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie")
            .into_owned();
        let user: Value = test::read_body_json(res).await;
        (cookie, user)
    }};
}

#[actix_web::test]
async fn ride_flows_from_request_to_driver_earnings() {
    let app = test::init_service(build_app(deps())).await;
    let (passenger, _) = session_for!(app, "pat", "ROLE_USER");
    let (driver, dee) = session_for!(app, "dee", "ROLE_DRIVER");
    let driver_id = dee["id"].as_str().expect("driver id").to_owned();

    let res = call!(
        app,
        test::TestRequest::post()
            .uri("/api/rides")
            .cookie(passenger.clone())
            .set_json(json!({
                "pickupLocation": "Old Town",
                "dropLocation": "Harbour",
                "distanceKm": 6.5,
                "fare": 140.0
            }))
    );
    assert_eq!(res.status(), StatusCode::CREATED);
    let ride: Value = test::read_body_json(res).await;
    let ride_id = ride["id"].as_str().expect("ride id").to_owned();
    assert_eq!(ride["status"], "REQUESTED");
    assert!(ride["driverId"].is_null());

    let res = call!(
        app,
        test::TestRequest::get()
            .uri("/api/rides/pending")
            .cookie(driver.clone())
    );
    let pending: Value = test::read_body_json(res).await;
    assert_eq!(pending.as_array().map(Vec::len), Some(1));

    let res = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/rides/accept/{ride_id}"))
            .cookie(driver.clone())
    );
    assert_eq!(res.status(), StatusCode::OK);

    let res = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/driver/{driver_id}/active-rides"))
            .cookie(driver.clone())
    );
    let active: Value = test::read_body_json(res).await;
    assert_eq!(active[0]["id"], ride_id.as_str());

    let res = call!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/rides/complete/{ride_id}"))
            .cookie(driver.clone())
    );
    assert_eq!(res.status(), StatusCode::OK);
    let done: Value = test::read_body_json(res).await;
    assert_eq!(done["status"], "COMPLETED");

    let res = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/analytics/driver/{driver_id}/earnings"))
            .cookie(passenger.clone())
    );
    let earnings: Value = test::read_body_json(res).await;
    assert_eq!(earnings.as_f64(), Some(140.0));

    let res = call!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/rides/search?text=harbour")
            .cookie(passenger)
    );
    let found: Value = test::read_body_json(res).await;
    assert_eq!(found.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn errors_carry_a_trace_id_matching_the_header() {
    let app = test::init_service(build_app(deps())).await;
    let (passenger, _) = session_for!(app, "pat", "ROLE_USER");

    let res = call!(
        app,
        test::TestRequest::post()
            .uri("/api/rides/accept/not-a-uuid")
            .cookie(passenger)
    );
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let header = res
        .headers()
        .get("trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["traceId"], header.as_str());
}

/// The browser's cookie is replaced by an empty one. Cookie sessions are
/// stateless, so a copy of the earlier cookie stays valid until it expires.
#[actix_web::test]
async fn logout_replaces_the_cookie_with_an_unauthenticated_one() {
    let app = test::init_service(build_app(deps())).await;
    let (passenger, _) = session_for!(app, "pat", "ROLE_USER");

    let res = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/logout")
            .cookie(passenger)
    );
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cleared = res
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("removal cookie")
        .into_owned();

    let res = call!(
        app,
        test::TestRequest::get().uri("/api/auth/me").cookie(cleared)
    );
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
