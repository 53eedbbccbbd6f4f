//! Ride statistics endpoints.

use actix_web::{get, web};

use crate::domain::{DailyRideCount, DriverSummary, StatusCount, UserSpending};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    DailyRideCountSchema, DriverSummarySchema, ErrorSchema, StatusCountSchema, UserSpendingSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id};

const DRIVER_ID: FieldName = FieldName::new("driverId");

/// Fare total of the driver's completed rides, as a bare JSON number.
#[utoipa::path(
    get,
    path = "/api/analytics/driver/{driver_id}/earnings",
    params(("driver_id" = String, Path, description = "Driver identifier")),
    responses(
        (status = 200, description = "Total earnings; 0 when the driver has no completed rides", body = f64),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["analytics"],
    operation_id = "driverEarnings"
)]
#[get("/api/analytics/driver/{driver_id}/earnings")]
pub async fn driver_earnings(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<f64>> {
    session.require_user_id()?;
    let driver_id = parse_user_id(&path, DRIVER_ID)?;
    Ok(web::Json(state.analytics.driver_earnings(driver_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/rides-per-day",
    responses(
        (status = 200, description = "Ride counts per UTC day, oldest first", body = [DailyRideCountSchema]),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["analytics"],
    operation_id = "ridesPerDay"
)]
#[get("/api/v1/analytics/rides-per-day")]
pub async fn rides_per_day(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DailyRideCount>>> {
    session.require_user_id()?;
    Ok(web::Json(state.analytics.rides_per_day().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/driver/{driver_id}/summary",
    params(("driver_id" = String, Path, description = "Driver identifier")),
    responses(
        (status = 200, description = "Completed-ride totals", body = DriverSummarySchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["analytics"],
    operation_id = "driverSummary"
)]
#[get("/api/v1/analytics/driver/{driver_id}/summary")]
pub async fn driver_summary(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DriverSummary>> {
    session.require_user_id()?;
    let driver_id = parse_user_id(&path, DRIVER_ID)?;
    Ok(web::Json(state.analytics.driver_summary(driver_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/user/{user_id}/spending",
    params(("user_id" = String, Path, description = "Passenger identifier")),
    responses(
        (status = 200, description = "Completed-ride spending", body = UserSpendingSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["analytics"],
    operation_id = "userSpending"
)]
#[get("/api/v1/analytics/user/{user_id}/spending")]
pub async fn user_spending(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserSpending>> {
    session.require_user_id()?;
    let user_id = parse_user_id(&path, FieldName::new("userId"))?;
    Ok(web::Json(state.analytics.user_spending(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/status-summary",
    responses(
        (status = 200, description = "Ride counts per status", body = [StatusCountSchema]),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["analytics"],
    operation_id = "statusSummary"
)]
#[get("/api/v1/analytics/status-summary")]
pub async fn status_summary(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<StatusCount>>> {
    session.require_user_id()?;
    Ok(web::Json(state.analytics.status_summary().await?))
}
