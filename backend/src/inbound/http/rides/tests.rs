//! Handler tests for the ride lifecycle endpoints, run against the in-memory
//! adapters.

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{memory_state, register_and_login, test_app};

async fn send<S, B>(app: &S, request: test::TestRequest, cookie: &Cookie<'static>) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, request.cookie(cookie.clone()).to_request()).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

fn create_ride(pickup: &str, drop: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/rides")
        .set_json(json!({"pickupLocation": pickup, "dropLocation": drop, "distanceKm": 7.5, "fare": 180.0}))
}

fn accept(id: &str) -> test::TestRequest {
    test::TestRequest::post().uri(&format!("/api/rides/accept/{id}"))
}

fn complete(id: &str) -> test::TestRequest {
    test::TestRequest::post().uri(&format!("/api/rides/complete/{id}"))
}

fn ride_id(ride: &Value) -> String {
    ride["id"].as_str().expect("ride id").to_owned()
}

#[rstest]
#[actix_web::test]
async fn request_accept_complete_round_trip() {
    let app = test::init_service(test_app(memory_state())).await;
    let (passenger, user) = register_and_login(&app, "alice", "ROLE_USER").await;
    let (driver, dave) = register_and_login(&app, "dave", "ROLE_DRIVER").await;

    let (status, ride) = send(&app, create_ride("A", "B"), &passenger).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ride["status"], "REQUESTED");
    assert_eq!(ride["driverId"], Value::Null);
    assert_eq!(ride["userId"], user["id"]);
    let id = ride_id(&ride);

    let (status, ride) = send(&app, accept(&id), &driver).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ride["status"], "ACCEPTED");
    assert_eq!(ride["driverId"], dave["id"]);

    let (status, ride) = send(&app, complete(&id), &passenger).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ride["status"], "COMPLETED");
    assert_eq!(ride["driverId"], dave["id"]);

    let (status, body) = send(&app, accept(&id), &driver).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_state");

    let (status, body) = send(&app, complete(&id), &driver).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_state");
}

#[rstest]
#[actix_web::test]
async fn ride_endpoints_require_a_session() {
    let app = test::init_service(test_app(memory_state())).await;

    for request in [
        create_ride("A", "B").to_request(),
        test::TestRequest::get().uri("/api/rides/user/me").to_request(),
        test::TestRequest::get().uri("/api/rides/pending").to_request(),
    ] {
        let res = test::call_service(&app, request).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

#[rstest]
#[actix_web::test]
async fn drivers_cannot_request_and_passengers_cannot_accept() {
    let app = test::init_service(test_app(memory_state())).await;
    let (passenger, _) = register_and_login(&app, "alice", "ROLE_USER").await;
    let (driver, _) = register_and_login(&app, "dave", "ROLE_DRIVER").await;

    let (status, body) = send(&app, create_ride("A", "B"), &driver).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    let (_, ride) = send(&app, create_ride("A", "B"), &passenger).await;
    let (status, _) = send(&app, accept(&ride_id(&ride)), &passenger).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn strangers_cannot_complete_a_ride() {
    let app = test::init_service(test_app(memory_state())).await;
    let (passenger, _) = register_and_login(&app, "alice", "ROLE_USER").await;
    let (driver, _) = register_and_login(&app, "dave", "ROLE_DRIVER").await;
    let (stranger, _) = register_and_login(&app, "eve", "ROLE_DRIVER").await;

    let (_, ride) = send(&app, create_ride("A", "B"), &passenger).await;
    let id = ride_id(&ride);
    let _ = send(&app, accept(&id), &driver).await;

    let (status, body) = send(&app, complete(&id), &stranger).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");
}

#[rstest]
#[actix_web::test]
async fn completing_a_requested_ride_is_invalid_state() {
    let app = test::init_service(test_app(memory_state())).await;
    let (passenger, _) = register_and_login(&app, "alice", "ROLE_USER").await;

    let (_, ride) = send(&app, create_ride("A", "B"), &passenger).await;
    let (status, body) = send(&app, complete(&ride_id(&ride)), &passenger).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_state");
}

#[rstest]
#[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", StatusCode::NOT_FOUND, "not_found")]
#[case("not-a-uuid", StatusCode::BAD_REQUEST, "invalid_request")]
#[actix_web::test]
async fn accepting_unknown_or_malformed_ids(
    #[case] id: &str,
    #[case] expected: StatusCode,
    #[case] code: &str,
) {
    let app = test::init_service(test_app(memory_state())).await;
    let (driver, _) = register_and_login(&app, "dave", "ROLE_DRIVER").await;

    let (status, body) = send(&app, accept(id), &driver).await;

    assert_eq!(status, expected);
    assert_eq!(body["code"], code);
}

#[rstest]
#[actix_web::test]
async fn blank_pickup_is_rejected() {
    let app = test::init_service(test_app(memory_state())).await;
    let (passenger, _) = register_and_login(&app, "alice", "ROLE_USER").await;

    let (status, body) = send(&app, create_ride("   ", "B"), &passenger).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "pickupLocation");
}

#[rstest]
#[actix_web::test]
async fn listing_endpoints_scope_to_the_caller() {
    let app = test::init_service(test_app(memory_state())).await;
    let (alice, _) = register_and_login(&app, "alice", "ROLE_USER").await;
    let (bob, _) = register_and_login(&app, "bob", "ROLE_USER").await;
    let (driver, _) = register_and_login(&app, "dave", "ROLE_DRIVER").await;

    let (_, first) = send(&app, create_ride("A", "B"), &alice).await;
    let _ = send(&app, create_ride("C", "D"), &alice).await;
    let _ = send(&app, create_ride("E", "F"), &bob).await;
    let _ = send(&app, accept(&ride_id(&first)), &driver).await;

    let (_, mine) = send(&app, test::TestRequest::get().uri("/api/rides/user/me"), &alice).await;
    assert_eq!(mine.as_array().map(Vec::len), Some(2));

    let (_, assigned) =
        send(&app, test::TestRequest::get().uri("/api/rides/driver/me"), &driver).await;
    assert_eq!(assigned.as_array().map(Vec::len), Some(1));
    assert_eq!(assigned[0]["id"], first["id"]);

    let (_, pending) = send(&app, test::TestRequest::get().uri("/api/rides/pending"), &driver).await;
    assert_eq!(pending.as_array().map(Vec::len), Some(2));

    let (status, _) = send(&app, test::TestRequest::get().uri("/api/rides/pending"), &alice).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
