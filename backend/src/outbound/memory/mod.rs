//! In-process adapters for the driven ports.
//!
//! Used when no database URL is configured and by HTTP tests. State lives for
//! the lifetime of the process.

mod ride_repository;
mod user_repository;

pub use ride_repository::InMemoryRideRepository;
pub use user_repository::InMemoryUserRepository;
