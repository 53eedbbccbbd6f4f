//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters. Driving ports (`*Command`, `*Query`) are implemented by
//! domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod password_hasher;
mod ride_analytics_query;
mod ride_analytics_repository;
mod ride_command;
mod ride_repository;
mod ride_search_query;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHash, PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use ride_analytics_query::MockRideAnalyticsQuery;
pub use ride_analytics_query::RideAnalyticsQuery;
#[cfg(test)]
pub use ride_analytics_repository::MockRideAnalyticsRepository;
pub use ride_analytics_repository::{RideAnalyticsRepository, RideAnalyticsRepositoryError};
#[cfg(test)]
pub use ride_command::MockRideCommand;
pub use ride_command::RideCommand;
#[cfg(test)]
pub use ride_repository::MockRideRepository;
pub use ride_repository::{RideRepository, RideRepositoryError};
#[cfg(test)]
pub use ride_search_query::MockRideSearchQuery;
pub use ride_search_query::{AdvancedSearch, AdvancedSearchError, RideSearchQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};
