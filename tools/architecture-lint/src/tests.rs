//! Unit tests for the architecture lint.

use std::path::PathBuf;

use rstest::rstest;

use super::*;

fn lint_one(file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
    lint_sources(&[LintSource {
        file: PathBuf::from(file),
        contents: contents.to_owned(),
    }])
}

#[rstest]
#[case("inbound/http/rides.rs", "use crate::domain::RideId; fn h() { let _ = RideId::random(); }", true)]
#[case("inbound/http/rides.rs", "use crate::outbound::memory::InMemoryRideRepository;", false)]
#[case("inbound/http/rides.rs", "use outbound::persistence::DieselRideRepository;", false)]
#[case("inbound/http/rides.rs", "use rideshare::outbound::persistence::DbPool;", false)]
#[case("inbound/http/rides.rs", "use diesel::prelude::*;", false)]
#[case("inbound/http/auth.rs", "fn h() { let _ = bcrypt::DEFAULT_COST; }", false)]
#[case("domain/ride.rs", "use crate::inbound::http; fn f() {}", false)]
#[case("domain/ride.rs", "use utoipa::ToSchema; #[derive(ToSchema)] struct Foo;", false)]
#[case("domain/ride.rs", "use actix_web::HttpResponse;", false)]
#[case("domain/ride.rs", "use chrono::Utc; use serde::Serialize;", true)]
#[case("outbound/persistence/diesel_ride_repository.rs", "use crate::inbound::http;", false)]
#[case("outbound/persistence/diesel_ride_repository.rs", "use actix_session::Session;", false)]
#[case("outbound/persistence/diesel_ride_repository.rs", "use crate::domain::ports::RideRepository;", true)]
fn detects_boundary_violations(#[case] file: &str, #[case] contents: &str, #[case] ok: bool) {
    let result = lint_one(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
#[case("inbound/http/test_utils.rs")]
#[case("inbound/http/rides/tests.rs")]
#[case("domain/error/tests.rs")]
fn test_support_files_may_wire_adapters(#[case] file: &str) {
    assert!(lint_one(file, "use crate::outbound::memory::InMemoryUserRepository;").is_ok());
}

#[test]
fn files_outside_the_layers_are_rejected() {
    let err = lint_one("server/mod.rs", "fn f() {}").expect_err("unknown layer");
    assert!(matches!(err, ArchitectureLintError::Parse { .. }));
}

#[test]
fn every_violation_in_a_file_is_reported_once() {
    let err = lint_one(
        "domain/ride.rs",
        "use diesel::prelude::*; use diesel::sql_types::Text; use crate::outbound::memory;",
    )
    .expect_err("violations");
    let ArchitectureLintError::Violations(violations) = err else {
        panic!("expected violations, got {err:?}");
    };
    let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
    assert_eq!(
        messages,
        [
            "domain module must not depend on crate::outbound",
            "domain module must not depend on external crate `diesel`",
        ]
    );
}
