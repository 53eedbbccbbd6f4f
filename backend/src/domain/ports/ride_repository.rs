//! Driven port for ride storage.

use async_trait::async_trait;

use crate::domain::{Ride, RideId, RideQuerySpec, RideStatus};

use super::define_port_error;

define_port_error! {
    /// Failures raised by ride repository adapters.
    pub enum RideRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "ride repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } => "ride repository query failed: {message}",
    }
}

/// Ride persistence with an atomic conditional update.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideRepository: Send + Sync {
    async fn insert(&self, ride: &Ride) -> Result<(), RideRepositoryError>;

    async fn find_by_id(&self, id: &RideId) -> Result<Option<Ride>, RideRepositoryError>;

    /// Overwrite the stored ride with `ride` only if its stored status still
    /// equals `expected`. Returns `false` when the ride is missing or its
    /// status has moved on; the check and write happen atomically.
    async fn compare_and_set(
        &self,
        ride: &Ride,
        expected: RideStatus,
    ) -> Result<bool, RideRepositoryError>;

    /// Rides matching `spec`, honouring its sort and page window.
    async fn find(&self, spec: &RideQuerySpec) -> Result<Vec<Ride>, RideRepositoryError>;

    /// Round-trip to the store, used by the startup diagnostic.
    async fn ping(&self) -> Result<(), RideRepositoryError>;
}
