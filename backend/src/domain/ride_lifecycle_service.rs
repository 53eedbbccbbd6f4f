//! Ride lifecycle service: request, accept and complete.
//!
//! Transitions are persisted with [`RideRepository::compare_and_set`], so two
//! drivers racing for the same ride cannot both win.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::account_service::map_user_error;
use crate::domain::ports::{RideCommand, RideRepository, RideRepositoryError, UserRepository};
use crate::domain::{
    Error, Ride, RideDraft, RideFilter, RideId, RideQuerySpec, RideStatus, RideTransitionError,
    Role, User, UserId,
};

pub(crate) fn map_ride_error(error: RideRepositoryError) -> Error {
    match error {
        RideRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ride repository unavailable: {message}"))
        }
        RideRepositoryError::Query { message } => {
            Error::internal(format!("ride repository error: {message}"))
        }
    }
}

fn transition_error(ride_id: RideId, error: RideTransitionError) -> Error {
    warn!(%ride_id, current = %error.current(), "rejected ride transition");
    Error::invalid_state(error.to_string())
}

/// Lifecycle service implementing [`RideCommand`].
#[derive(Clone)]
pub struct RideLifecycleService<U, R> {
    users: Arc<U>,
    rides: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<U, R> RideLifecycleService<U, R> {
    pub fn new(users: Arc<U>, rides: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            rides,
            clock,
        }
    }
}

impl<U, R> RideLifecycleService<U, R>
where
    U: UserRepository,
    R: RideRepository,
{
    async fn resolve_caller(&self, caller: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(&caller)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {caller} not found")))
    }

    async fn load_ride(&self, ride_id: RideId) -> Result<Ride, Error> {
        self.rides
            .find_by_id(&ride_id)
            .await
            .map_err(map_ride_error)?
            .ok_or_else(|| Error::not_found(format!("ride {ride_id} not found")))
    }

    /// Persist `updated` if the stored ride still holds `expected`.
    ///
    /// A lost race is reported against the status that won it.
    async fn commit(&self, updated: Ride, expected: RideStatus) -> Result<Ride, Error> {
        let applied = self
            .rides
            .compare_and_set(&updated, expected)
            .await
            .map_err(map_ride_error)?;
        if applied {
            return Ok(updated);
        }
        let current = self.load_ride(updated.id()).await?;
        let error = match expected {
            RideStatus::Requested => RideTransitionError::NotRequested {
                current: current.status(),
            },
            RideStatus::Accepted | RideStatus::Completed => RideTransitionError::NotAccepted {
                current: current.status(),
            },
        };
        Err(transition_error(updated.id(), error))
    }

    async fn find(&self, spec: RideQuerySpec) -> Result<Vec<Ride>, Error> {
        self.rides.find(&spec).await.map_err(map_ride_error)
    }
}

#[async_trait]
impl<U, R> RideCommand for RideLifecycleService<U, R>
where
    U: UserRepository,
    R: RideRepository,
{
    async fn request_ride(&self, caller: UserId, draft: RideDraft) -> Result<Ride, Error> {
        let user = self.resolve_caller(caller).await?;
        if !user.has_role(Role::Passenger) {
            return Err(Error::forbidden("only passengers can request rides"));
        }
        let ride = Ride::request(RideId::random(), user.id(), draft, self.clock.utc());
        self.rides.insert(&ride).await.map_err(map_ride_error)?;
        info!(ride_id = %ride.id(), passenger_id = %user.id(), "ride requested");
        Ok(ride)
    }

    async fn accept_ride(&self, caller: UserId, ride_id: RideId) -> Result<Ride, Error> {
        let driver = self.resolve_caller(caller).await?;
        if !driver.has_role(Role::Driver) {
            return Err(Error::forbidden("only drivers can accept rides"));
        }
        let ride = self.load_ride(ride_id).await?;
        let accepted = ride
            .accept(driver.id())
            .map_err(|err| transition_error(ride_id, err))?;
        let accepted = self.commit(accepted, RideStatus::Requested).await?;
        info!(%ride_id, driver_id = %driver.id(), "ride accepted");
        Ok(accepted)
    }

    async fn complete_ride(&self, caller: UserId, ride_id: RideId) -> Result<Ride, Error> {
        let user = self.resolve_caller(caller).await?;
        let ride = self.load_ride(ride_id).await?;
        let completed = ride
            .complete()
            .map_err(|err| transition_error(ride_id, err))?;
        if !ride.involves(user.id()) {
            return Err(Error::forbidden(
                "only the ride's passenger or driver can complete it",
            ));
        }
        let completed = self.commit(completed, RideStatus::Accepted).await?;
        info!(%ride_id, completed_by = %user.id(), "ride completed");
        Ok(completed)
    }

    async fn rides_for_passenger(&self, caller: UserId) -> Result<Vec<Ride>, Error> {
        let user = self.resolve_caller(caller).await?;
        self.find(RideQuerySpec::all().with(RideFilter::Passenger(user.id())))
            .await
    }

    async fn rides_for_driver(&self, caller: UserId) -> Result<Vec<Ride>, Error> {
        let user = self.resolve_caller(caller).await?;
        self.find(RideQuerySpec::all().with(RideFilter::Driver(user.id())))
            .await
    }

    async fn pending_rides(&self, caller: UserId) -> Result<Vec<Ride>, Error> {
        let user = self.resolve_caller(caller).await?;
        if !user.has_role(Role::Driver) {
            return Err(Error::forbidden("only drivers can list pending rides"));
        }
        self.find(RideQuerySpec::all().with(RideFilter::Status(RideStatus::Requested)))
            .await
    }
}

#[cfg(test)]
#[path = "ride_lifecycle_service_tests.rs"]
mod tests;
