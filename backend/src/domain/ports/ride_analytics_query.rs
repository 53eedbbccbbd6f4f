//! Driving port for ride statistics.

use async_trait::async_trait;

use crate::domain::{DailyRideCount, DriverSummary, Error, StatusCount, UserId, UserSpending};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideAnalyticsQuery: Send + Sync {
    /// Fare total over the driver's completed rides; `0.0` when none.
    async fn driver_earnings(&self, driver_id: UserId) -> Result<f64, Error>;

    async fn rides_per_day(&self) -> Result<Vec<DailyRideCount>, Error>;

    async fn driver_summary(&self, driver_id: UserId) -> Result<DriverSummary, Error>;

    async fn user_spending(&self, user_id: UserId) -> Result<UserSpending, Error>;

    async fn status_summary(&self) -> Result<Vec<StatusCount>, Error>;
}
