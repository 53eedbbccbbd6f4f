//! PostgreSQL adapters built on Diesel and `diesel-async`.
//!
//! Repositories are thin translators between rows and domain types. The
//! query specification translation lives in [`DieselRideRepository`].

mod diesel_basic_error_mapping;
mod diesel_ride_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_ride_repository::DieselRideRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
