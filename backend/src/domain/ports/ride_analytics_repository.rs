//! Driven port for ride aggregations computed by the store.

use async_trait::async_trait;

use crate::domain::{DailyRideCount, DriverSummary, StatusCount, UserId, UserSpending};

use super::define_port_error;

define_port_error! {
    /// Failures raised by analytics adapters.
    pub enum RideAnalyticsRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "ride analytics connection failed: {message}",
        /// An aggregation failed.
        Query { message: String } => "ride analytics query failed: {message}",
    }
}

/// Each call recomputes from the full ride set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideAnalyticsRepository: Send + Sync {
    /// Fare total over completed rides of `driver_id`; zero when none.
    async fn completed_earnings(
        &self,
        driver_id: &UserId,
    ) -> Result<f64, RideAnalyticsRepositoryError>;

    /// Ride counts per UTC creation day, ascending.
    async fn daily_ride_counts(
        &self,
    ) -> Result<Vec<DailyRideCount>, RideAnalyticsRepositoryError>;

    async fn driver_summary(
        &self,
        driver_id: &UserId,
    ) -> Result<DriverSummary, RideAnalyticsRepositoryError>;

    async fn user_spending(
        &self,
        user_id: &UserId,
    ) -> Result<UserSpending, RideAnalyticsRepositoryError>;

    /// Counts for statuses that occur, in lifecycle order.
    async fn status_counts(&self) -> Result<Vec<StatusCount>, RideAnalyticsRepositoryError>;
}
