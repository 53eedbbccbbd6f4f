//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay free of `utoipa`. The wrappers below mirror their wire
//! shape and are registered under the domain names, so handlers document
//! bodies as `RideSchema` while clients see `Ride`.

use utoipa::ToSchema;

/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// A lifecycle precondition does not hold for the ride.
    #[schema(rename = "invalid_state")]
    InvalidState,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The resource already exists.
    #[schema(rename = "conflict")]
    Conflict,
    /// The ride store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// API error response payload.
#[derive(ToSchema)]
#[schema(as = Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_state")]
    code: ErrorCodeSchema,
    #[schema(example = "ride is ACCEPTED; only REQUESTED rides can be accepted")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level context, e.g. `{"field": "start", "code": "invalid_date"}`.
    details: Option<serde_json::Value>,
}

/// Account role.
#[derive(ToSchema)]
#[schema(as = Role)]
pub enum RoleSchema {
    #[schema(rename = "ROLE_USER")]
    Passenger,
    #[schema(rename = "ROLE_DRIVER")]
    Driver,
}

/// Registered account. The password hash is never returned.
#[derive(ToSchema)]
#[schema(as = User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(example = "alice")]
    username: String,
    role: RoleSchema,
}

/// Ride lifecycle state.
#[derive(ToSchema)]
#[schema(as = RideStatus)]
pub enum RideStatusSchema {
    #[schema(rename = "REQUESTED")]
    Requested,
    #[schema(rename = "ACCEPTED")]
    Accepted,
    #[schema(rename = "COMPLETED")]
    Completed,
}

/// Ride record. `driverId` is null exactly when `status` is `REQUESTED`.
#[derive(ToSchema)]
#[schema(as = Ride)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RideSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    /// Requesting passenger.
    #[schema(value_type = String, format = Uuid)]
    user_id: String,
    #[schema(value_type = Option<String>, format = Uuid)]
    driver_id: Option<String>,
    #[schema(example = "Koramangala")]
    pickup_location: String,
    #[schema(example = "Indiranagar")]
    drop_location: String,
    #[schema(example = 7.5)]
    distance_km: f64,
    #[schema(example = 180.0)]
    fare: f64,
    status: RideStatusSchema,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// Ride count for one UTC calendar day.
#[derive(ToSchema)]
#[schema(as = DailyRideCount)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DailyRideCountSchema {
    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    date: String,
    count: u64,
}

/// Completed-ride totals for a driver.
#[derive(ToSchema)]
#[schema(as = DriverSummary)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DriverSummarySchema {
    #[schema(value_type = String, format = Uuid)]
    driver_id: String,
    completed_rides: u64,
    total_earnings: f64,
    /// Mean distance of completed rides; `0` when there are none.
    avg_distance: f64,
}

/// Completed-ride spending for a passenger.
#[derive(ToSchema)]
#[schema(as = UserSpending)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSpendingSchema {
    #[schema(value_type = String, format = Uuid)]
    user_id: String,
    total_rides: u64,
    total_spent: f64,
}

/// Ride count for one status.
#[derive(ToSchema)]
#[schema(as = StatusCount)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct StatusCountSchema {
    status: RideStatusSchema,
    count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn wrappers_register_under_domain_names() {
        assert_eq!(ErrorSchema::name(), "Error");
        assert_eq!(RideSchema::name(), "Ride");
        assert_eq!(UserSchema::name(), "User");
        assert_eq!(DriverSummarySchema::name(), "DriverSummary");
    }

    #[rstest]
    #[case("invalid_request")]
    #[case("invalid_state")]
    #[case("conflict")]
    #[case("service_unavailable")]
    fn error_code_schema_lists_variant(#[case] variant: &str) {
        assert!(schema_to_json::<ErrorCodeSchema>().contains(variant));
    }

    #[rstest]
    #[case("userId")]
    #[case("driverId")]
    #[case("pickupLocation")]
    #[case("distanceKm")]
    #[case("createdAt")]
    fn ride_schema_uses_camel_case_fields(#[case] field: &str) {
        assert!(schema_to_json::<RideSchema>().contains(field));
    }

    #[rstest]
    fn ride_status_schema_uses_wire_names() {
        let json = schema_to_json::<RideStatusSchema>();
        assert!(json.contains("REQUESTED") && json.contains("COMPLETED"));
    }
}
