//! Read-only ride search endpoints under `/api/v1`.
//!
//! Query parameters are taken as raw strings and validated here so that
//! missing or malformed values share the JSON error shape of the rest of the
//! API.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::AdvancedSearch;
use crate::domain::{Ride, SortDirection};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, RideSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, map_advanced_search_error, parse_date, parse_number, parse_status, parse_user_id,
    require,
};

type RidesResponse = ApiResult<web::Json<Vec<Ride>>>;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct KeywordParams {
    /// Substring matched case-insensitively against pickup and drop.
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DistanceParams {
    /// Inclusive lower bound in kilometres.
    pub min: Option<String>,
    /// Inclusive upper bound in kilometres.
    pub max: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRangeParams {
    /// First day (`YYYY-MM-DD`, UTC).
    pub start: Option<String>,
    /// Last day, inclusive.
    pub end: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortParams {
    /// `asc` for ascending; anything else sorts descending.
    pub order: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusKeywordParams {
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdvancedSearchParams {
    pub search: Option<String>,
    pub status: Option<String>,
    /// One of `fare`, `distanceKm`, `createdAt`, `status`, `pickupLocation`,
    /// `dropLocation`.
    pub sort: Option<String>,
    /// Defaults to `asc`.
    pub order: Option<String>,
    /// Zero-based page, default 0.
    pub page: Option<u32>,
    /// Page size, default 10, at most 100.
    pub size: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/rides/search",
    params(KeywordParams),
    responses(
        (status = 200, description = "Matching rides", body = [RideSchema]),
        (status = 400, description = "Missing text", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["ride-search"],
    operation_id = "searchRides"
)]
#[get("/api/v1/rides/search")]
pub async fn search(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<KeywordParams>,
) -> RidesResponse {
    session.require_user_id()?;
    let text = require(query.into_inner().text, FieldName::new("text"))?;
    Ok(web::Json(state.ride_search.search(text).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/rides/filter-distance",
    params(DistanceParams),
    responses(
        (status = 200, description = "Rides within the distance range", body = [RideSchema]),
        (status = 400, description = "Missing or non-numeric bound", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["ride-search"],
    operation_id = "filterRidesByDistance"
)]
#[get("/api/v1/rides/filter-distance")]
pub async fn filter_distance(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DistanceParams>,
) -> RidesResponse {
    session.require_user_id()?;
    let DistanceParams { min, max } = query.into_inner();
    let min_field = FieldName::new("min");
    let max_field = FieldName::new("max");
    let min = parse_number(&require(min, min_field)?, min_field)?;
    let max = parse_number(&require(max, max_field)?, max_field)?;
    Ok(web::Json(state.ride_search.filter_by_distance(min, max).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/rides/filter-date-range",
    params(DateRangeParams),
    responses(
        (status = 200, description = "Rides created within the day range", body = [RideSchema]),
        (status = 400, description = "Missing or malformed date", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["ride-search"],
    operation_id = "filterRidesByDateRange"
)]
#[get("/api/v1/rides/filter-date-range")]
pub async fn filter_date_range(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DateRangeParams>,
) -> RidesResponse {
    session.require_user_id()?;
    let DateRangeParams { start, end } = query.into_inner();
    let start_field = FieldName::new("start");
    let end_field = FieldName::new("end");
    let start = parse_date(&require(start, start_field)?, start_field)?;
    let end = parse_date(&require(end, end_field)?, end_field)?;
    Ok(web::Json(
        state.ride_search.filter_by_date_range(start, end).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/rides/sort",
    params(SortParams),
    responses(
        (status = 200, description = "All rides ordered by fare", body = [RideSchema]),
        (status = 400, description = "Missing order", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["ride-search"],
    operation_id = "sortRidesByFare"
)]
#[get("/api/v1/rides/sort")]
pub async fn sort_by_fare(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SortParams>,
) -> RidesResponse {
    session.require_user_id()?;
    let order = require(query.into_inner().order, FieldName::new("order"))?;
    let direction = SortDirection::parse(&order);
    Ok(web::Json(state.ride_search.sort_by_fare(direction).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/rides/user/{user_id}",
    params(("user_id" = String, Path, description = "Passenger identifier")),
    responses(
        (status = 200, description = "Rides requested by the user", body = [RideSchema]),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["ride-search"],
    operation_id = "ridesByUser"
)]
#[get("/api/v1/rides/user/{user_id}")]
pub async fn rides_by_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> RidesResponse {
    session.require_user_id()?;
    let user_id = parse_user_id(&path, FieldName::new("userId"))?;
    Ok(web::Json(state.ride_search.rides_by_user(user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/rides/user/{user_id}/status/{status}",
    params(
        ("user_id" = String, Path, description = "Passenger identifier"),
        ("status" = String, Path, description = "REQUESTED, ACCEPTED or COMPLETED")
    ),
    responses(
        (status = 200, description = "User's rides in that status", body = [RideSchema]),
        (status = 400, description = "Malformed id or unknown status", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["ride-search"],
    operation_id = "ridesByUserAndStatus"
)]
#[get("/api/v1/rides/user/{user_id}/status/{status}")]
pub async fn rides_by_user_and_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> RidesResponse {
    session.require_user_id()?;
    let (user_id, status) = path.into_inner();
    let user_id = parse_user_id(&user_id, FieldName::new("userId"))?;
    let status = parse_status(&status, FieldName::new("status"))?;
    Ok(web::Json(
        state
            .ride_search
            .rides_by_user_and_status(user_id, status)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/driver/{driver_id}/active-rides",
    params(("driver_id" = String, Path, description = "Driver identifier")),
    responses(
        (status = 200, description = "ACCEPTED rides assigned to the driver", body = [RideSchema]),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["ride-search"],
    operation_id = "driverActiveRides"
)]
#[get("/api/v1/driver/{driver_id}/active-rides")]
pub async fn driver_active_rides(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> RidesResponse {
    session.require_user_id()?;
    let driver_id = parse_user_id(&path, FieldName::new("driverId"))?;
    Ok(web::Json(
        state.ride_search.driver_active_rides(driver_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/rides/filter-status",
    params(StatusKeywordParams),
    responses(
        (status = 200, description = "Rides with that status matching the keyword", body = [RideSchema]),
        (status = 400, description = "Missing parameter or unknown status", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["ride-search"],
    operation_id = "filterRidesByStatus"
)]
#[get("/api/v1/rides/filter-status")]
pub async fn filter_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<StatusKeywordParams>,
) -> RidesResponse {
    session.require_user_id()?;
    let StatusKeywordParams {
        status,
        search: keyword,
    } = query.into_inner();
    let status_field = FieldName::new("status");
    let status = parse_status(&require(status, status_field)?, status_field)?;
    let keyword = require(keyword, FieldName::new("search"))?;
    Ok(web::Json(
        state
            .ride_search
            .filter_by_status_and_keyword(status, keyword)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/rides/advanced-search",
    params(AdvancedSearchParams),
    responses(
        (status = 200, description = "One page of matching rides", body = [RideSchema]),
        (status = 400, description = "Unknown status or sort field, or bad page size", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["ride-search"],
    operation_id = "advancedRideSearch"
)]
#[get("/api/v1/rides/advanced-search")]
pub async fn advanced_search(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AdvancedSearchParams>,
) -> RidesResponse {
    session.require_user_id()?;
    let params = query.into_inner();
    let criteria = AdvancedSearch::try_from_parts(
        params.search.as_deref(),
        params.status.as_deref(),
        params.sort.as_deref(),
        params.order.as_deref(),
        params.page,
        params.size,
    )
    .map_err(map_advanced_search_error)?;
    Ok(web::Json(state.ride_search.advanced_search(criteria).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/rides/date/{date}",
    params(("date" = String, Path, description = "UTC calendar day, `YYYY-MM-DD`")),
    responses(
        (status = 200, description = "Rides created that day", body = [RideSchema]),
        (status = 400, description = "Malformed date", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["ride-search"],
    operation_id = "ridesOnDate"
)]
#[get("/api/v1/rides/date/{date}")]
pub async fn rides_on_date(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> RidesResponse {
    session.require_user_id()?;
    let date = parse_date(&path, FieldName::new("date"))?;
    Ok(web::Json(state.ride_search.rides_on_date(date).await?))
}
