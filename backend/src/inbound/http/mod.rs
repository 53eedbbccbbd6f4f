//! HTTP inbound adapter exposing the REST endpoints.

pub mod analytics;
pub mod auth;
pub mod error;
pub mod health;
pub mod ride_search;
pub mod rides;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every account, ride, search and analytics route.
///
/// Health probes are mounted separately because they carry their own state.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(rides::request_ride)
        .service(rides::accept_ride)
        .service(rides::complete_ride)
        .service(rides::my_driver_rides)
        .service(rides::my_passenger_rides)
        .service(rides::pending_rides)
        .service(ride_search::search)
        .service(ride_search::filter_distance)
        .service(ride_search::filter_date_range)
        .service(ride_search::sort_by_fare)
        .service(ride_search::rides_by_user)
        .service(ride_search::rides_by_user_and_status)
        .service(ride_search::driver_active_rides)
        .service(ride_search::filter_status)
        .service(ride_search::advanced_search)
        .service(ride_search::rides_on_date)
        .service(analytics::driver_earnings)
        .service(analytics::rides_per_day)
        .service(analytics::driver_summary)
        .service(analytics::user_spending)
        .service(analytics::status_summary);
}
