//! Driving port for the ride lifecycle.
//!
//! Every operation takes the caller's identity explicitly; role and ownership
//! checks happen inside the implementation.

use async_trait::async_trait;

use crate::domain::{Error, Ride, RideDraft, RideId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideCommand: Send + Sync {
    /// Open a ride for a passenger. Drivers are refused with `Forbidden`.
    async fn request_ride(&self, caller: UserId, draft: RideDraft) -> Result<Ride, Error>;

    /// Assign the calling driver to a `REQUESTED` ride.
    ///
    /// Check order: caller exists, caller is a driver, ride exists, ride is
    /// still `REQUESTED`. At most one of several concurrent accepts succeeds.
    async fn accept_ride(&self, caller: UserId, ride_id: RideId) -> Result<Ride, Error>;

    /// Complete an `ACCEPTED` ride on behalf of its passenger or driver.
    ///
    /// Check order: caller exists, ride exists, ride is `ACCEPTED`, caller
    /// takes part in the ride.
    async fn complete_ride(&self, caller: UserId, ride_id: RideId) -> Result<Ride, Error>;

    /// Rides the caller requested.
    async fn rides_for_passenger(&self, caller: UserId) -> Result<Vec<Ride>, Error>;

    /// Rides assigned to the caller as driver.
    async fn rides_for_driver(&self, caller: UserId) -> Result<Vec<Ride>, Error>;

    /// Rides awaiting a driver. Only drivers may list them.
    async fn pending_rides(&self, caller: UserId) -> Result<Vec<Ride>, Error>;
}
