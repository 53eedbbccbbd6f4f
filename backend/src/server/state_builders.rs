//! Explicit construction of services and adapters at process start.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{error, info};

use crate::domain::ports::{
    PasswordHasher, RideAnalyticsRepository, RideRepository, UserRepository,
};
use crate::domain::{
    AccountService, RideAnalyticsService, RideLifecycleService, RideSearchService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryRideRepository, InMemoryUserRepository};
use crate::outbound::persistence::{DbPool, DieselRideRepository, DieselUserRepository};
use crate::outbound::security::BcryptPasswordHasher;

use super::ServerConfig;

/// Wire every driving port over one user store and one ride store.
fn build_services<U, R, H>(users: Arc<U>, rides: Arc<R>, hasher: Arc<H>) -> HttpState
where
    U: UserRepository + 'static,
    R: RideRepository + RideAnalyticsRepository + 'static,
    H: PasswordHasher + 'static,
{
    HttpState::new(
        Arc::new(AccountService::new(users.clone(), hasher)),
        Arc::new(RideLifecycleService::new(
            users,
            rides.clone(),
            Arc::new(DefaultClock),
        )),
        Arc::new(RideSearchService::new(rides.clone())),
        Arc::new(RideAnalyticsService::new(rides)),
    )
}

/// Build the shared HTTP state, backed by PostgreSQL when a pool is
/// configured and by memory otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher = Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost));
    let state = match &config.db_pool {
        Some(pool) => build_services(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselRideRepository::new(pool.clone())),
            hasher,
        ),
        None => {
            info!("no database configured; users and rides are kept in memory");
            build_services(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryRideRepository::new()),
                hasher,
            )
        }
    };
    web::Data::new(state)
}

/// Ping the ride store once and log the outcome.
///
/// Returns whether the store answered; callers only use it for diagnostics.
pub async fn log_store_connectivity(rides: &dyn RideRepository) -> bool {
    match rides.ping().await {
        Ok(()) => {
            info!("ride store reachable");
            true
        }
        Err(err) => {
            error!(error = %err, "ride store unreachable; requests will fail until it recovers");
            false
        }
    }
}

/// Connectivity check against the PostgreSQL pool.
pub async fn log_database_connectivity(pool: &DbPool) -> bool {
    log_store_connectivity(&DieselRideRepository::new(pool.clone())).await
}
