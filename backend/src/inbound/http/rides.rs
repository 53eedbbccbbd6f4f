//! Ride lifecycle endpoints.
//!
//! The caller is always the session user; role and ownership checks happen in
//! the domain service.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Ride, RideDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, RideSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_ride_validation_error, parse_ride_id};

const RIDE_ID: FieldName = FieldName::new("id");

/// Ride request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRideRequest {
    #[schema(example = "Koramangala")]
    pub pickup_location: String,
    #[schema(example = "Indiranagar")]
    pub drop_location: String,
    /// Defaults to 0.
    #[serde(default)]
    #[schema(example = 7.5)]
    pub distance_km: Option<f64>,
    /// Defaults to 0.
    #[serde(default)]
    #[schema(example = 180.0)]
    pub fare: Option<f64>,
}

#[utoipa::path(
    post,
    path = "/api/rides",
    request_body = CreateRideRequest,
    responses(
        (status = 201, description = "Ride requested", body = RideSchema),
        (status = 400, description = "Blank location or invalid number", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema),
        (status = 403, description = "Caller is not a passenger", body = ErrorSchema),
        (status = 404, description = "Caller account not found", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "requestRide"
)]
#[post("/api/rides")]
pub async fn request_ride(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateRideRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user_id()?;
    let CreateRideRequest {
        pickup_location,
        drop_location,
        distance_km,
        fare,
    } = payload.into_inner();
    let draft = RideDraft::try_new(&pickup_location, &drop_location, distance_km, fare)
        .map_err(map_ride_validation_error)?;
    let ride = state.rides.request_ride(caller, draft).await?;
    Ok(HttpResponse::Created().json(ride))
}

#[utoipa::path(
    post,
    path = "/api/rides/accept/{id}",
    params(("id" = String, Path, description = "Ride identifier")),
    responses(
        (status = 200, description = "Ride accepted", body = RideSchema),
        (status = 400, description = "Ride is not REQUESTED or id is malformed", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema),
        (status = 403, description = "Caller is not a driver", body = ErrorSchema),
        (status = 404, description = "Ride or caller not found", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "acceptRide"
)]
#[post("/api/rides/accept/{id}")]
pub async fn accept_ride(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Ride>> {
    let caller = session.require_user_id()?;
    let ride_id = parse_ride_id(&path, RIDE_ID)?;
    let ride = state.rides.accept_ride(caller, ride_id).await?;
    Ok(web::Json(ride))
}

#[utoipa::path(
    post,
    path = "/api/rides/complete/{id}",
    params(("id" = String, Path, description = "Ride identifier")),
    responses(
        (status = 200, description = "Ride completed", body = RideSchema),
        (status = 400, description = "Ride is not ACCEPTED or id is malformed", body = ErrorSchema),
        (status = 401, description = "Not logged in", body = ErrorSchema),
        (status = 403, description = "Caller is neither passenger nor driver", body = ErrorSchema),
        (status = 404, description = "Ride or caller not found", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "completeRide"
)]
#[post("/api/rides/complete/{id}")]
pub async fn complete_ride(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Ride>> {
    let caller = session.require_user_id()?;
    let ride_id = parse_ride_id(&path, RIDE_ID)?;
    let ride = state.rides.complete_ride(caller, ride_id).await?;
    Ok(web::Json(ride))
}

/// Rides assigned to the calling driver.
#[utoipa::path(
    get,
    path = "/api/rides/driver/me",
    responses(
        (status = 200, description = "Driver's rides", body = [RideSchema]),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "myDriverRides"
)]
#[get("/api/rides/driver/me")]
pub async fn my_driver_rides(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Ride>>> {
    let caller = session.require_user_id()?;
    Ok(web::Json(state.rides.rides_for_driver(caller).await?))
}

/// Rides requested by the calling passenger.
#[utoipa::path(
    get,
    path = "/api/rides/user/me",
    responses(
        (status = 200, description = "Passenger's rides", body = [RideSchema]),
        (status = 401, description = "Not logged in", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "myPassengerRides"
)]
#[get("/api/rides/user/me")]
pub async fn my_passenger_rides(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Ride>>> {
    let caller = session.require_user_id()?;
    Ok(web::Json(state.rides.rides_for_passenger(caller).await?))
}

/// Rides still waiting for a driver.
#[utoipa::path(
    get,
    path = "/api/rides/pending",
    responses(
        (status = 200, description = "REQUESTED rides", body = [RideSchema]),
        (status = 401, description = "Not logged in", body = ErrorSchema),
        (status = 403, description = "Caller is not a driver", body = ErrorSchema)
    ),
    tags = ["rides"],
    operation_id = "pendingRides"
)]
#[get("/api/rides/pending")]
pub async fn pending_rides(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Ride>>> {
    let caller = session.require_user_id()?;
    Ok(web::Json(state.rides.pending_rides(caller).await?))
}

#[cfg(test)]
mod tests;
