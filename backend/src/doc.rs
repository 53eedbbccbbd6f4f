//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer, the
//! schema wrappers that describe domain types without coupling them to
//! utoipa, and the session cookie security scheme. Swagger UI serves it in
//! debug builds and `openapi-dump` prints it for external tooling.

use crate::inbound::http::auth::{LoginRequest, RegisterRequest};
use crate::inbound::http::rides::CreateRideRequest;
use crate::inbound::http::schemas::{
    DailyRideCountSchema, DriverSummarySchema, ErrorCodeSchema, ErrorSchema, RideSchema,
    RideStatusSchema, RoleSchema, StatusCountSchema, UserSchema, UserSpendingSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Rideshare backend API",
        description = "Session-authenticated ride requests, driver workflow, search and analytics.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::rides::request_ride,
        crate::inbound::http::rides::accept_ride,
        crate::inbound::http::rides::complete_ride,
        crate::inbound::http::rides::my_driver_rides,
        crate::inbound::http::rides::my_passenger_rides,
        crate::inbound::http::rides::pending_rides,
        crate::inbound::http::ride_search::search,
        crate::inbound::http::ride_search::filter_distance,
        crate::inbound::http::ride_search::filter_date_range,
        crate::inbound::http::ride_search::sort_by_fare,
        crate::inbound::http::ride_search::rides_by_user,
        crate::inbound::http::ride_search::rides_by_user_and_status,
        crate::inbound::http::ride_search::driver_active_rides,
        crate::inbound::http::ride_search::filter_status,
        crate::inbound::http::ride_search::advanced_search,
        crate::inbound::http::ride_search::rides_on_date,
        crate::inbound::http::analytics::driver_earnings,
        crate::inbound::http::analytics::rides_per_day,
        crate::inbound::http::analytics::driver_summary,
        crate::inbound::http::analytics::user_spending,
        crate::inbound::http::analytics::status_summary,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        CreateRideRequest,
        UserSchema,
        RoleSchema,
        RideSchema,
        RideStatusSchema,
        DailyRideCountSchema,
        DriverSummarySchema,
        UserSpendingSchema,
        StatusCountSchema,
        ErrorSchema,
        ErrorCodeSchema,
    )),
    tags(
        (name = "auth", description = "Registration and session management"),
        (name = "rides", description = "Requesting, accepting and completing rides"),
        (name = "ride-search", description = "Ride search, filtering and pagination"),
        (name = "analytics", description = "Aggregated ride statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
