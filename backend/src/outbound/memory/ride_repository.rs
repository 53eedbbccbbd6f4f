//! Mutex-guarded ride store, also serving analytics.
//!
//! Rides are kept in insertion order, which stands in for store order.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    RideAnalyticsRepository, RideAnalyticsRepositoryError, RideRepository, RideRepositoryError,
};
use crate::domain::{
    DailyRideCount, DriverSummary, Ride, RideId, RideQuerySpec, RideStatus, StatusCount, UserId,
    UserSpending, completed_earnings,
};

#[derive(Debug, Default)]
pub struct InMemoryRideRepository {
    rides: Mutex<Vec<Ride>>,
}

impl InMemoryRideRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn rides(&self) -> Result<MutexGuard<'_, Vec<Ride>>, RideRepositoryError> {
        self.rides
            .lock()
            .map_err(|_| RideRepositoryError::query("ride store lock poisoned"))
    }

    fn snapshot(&self) -> Result<Vec<Ride>, RideAnalyticsRepositoryError> {
        self.rides
            .lock()
            .map(|rides| rides.clone())
            .map_err(|_| RideAnalyticsRepositoryError::query("ride store lock poisoned"))
    }
}

#[async_trait]
impl RideRepository for InMemoryRideRepository {
    async fn insert(&self, ride: &Ride) -> Result<(), RideRepositoryError> {
        let mut rides = self.rides()?;
        if rides.iter().any(|r| r.id() == ride.id()) {
            return Err(RideRepositoryError::query(format!(
                "ride {} already exists",
                ride.id()
            )));
        }
        rides.push(ride.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &RideId) -> Result<Option<Ride>, RideRepositoryError> {
        Ok(self.rides()?.iter().find(|r| r.id() == *id).cloned())
    }

    async fn compare_and_set(
        &self,
        ride: &Ride,
        expected: RideStatus,
    ) -> Result<bool, RideRepositoryError> {
        let mut rides = self.rides()?;
        match rides
            .iter_mut()
            .find(|r| r.id() == ride.id() && r.status() == expected)
        {
            Some(slot) => {
                *slot = ride.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find(&self, spec: &RideQuerySpec) -> Result<Vec<Ride>, RideRepositoryError> {
        let rides = self.rides()?.clone();
        Ok(spec.evaluate(rides))
    }

    async fn ping(&self) -> Result<(), RideRepositoryError> {
        self.rides().map(|_| ())
    }
}

#[async_trait]
impl RideAnalyticsRepository for InMemoryRideRepository {
    async fn completed_earnings(
        &self,
        driver_id: &UserId,
    ) -> Result<f64, RideAnalyticsRepositoryError> {
        Ok(completed_earnings(*driver_id, &self.snapshot()?))
    }

    async fn daily_ride_counts(
        &self,
    ) -> Result<Vec<DailyRideCount>, RideAnalyticsRepositoryError> {
        Ok(DailyRideCount::from_rides(&self.snapshot()?))
    }

    async fn driver_summary(
        &self,
        driver_id: &UserId,
    ) -> Result<DriverSummary, RideAnalyticsRepositoryError> {
        Ok(DriverSummary::from_rides(*driver_id, &self.snapshot()?))
    }

    async fn user_spending(
        &self,
        user_id: &UserId,
    ) -> Result<UserSpending, RideAnalyticsRepositoryError> {
        Ok(UserSpending::from_rides(*user_id, &self.snapshot()?))
    }

    async fn status_counts(&self) -> Result<Vec<StatusCount>, RideAnalyticsRepositoryError> {
        Ok(StatusCount::from_rides(&self.snapshot()?))
    }
}
