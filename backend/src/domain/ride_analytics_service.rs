//! Ride statistics backed by [`RideAnalyticsRepository`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    RideAnalyticsQuery, RideAnalyticsRepository, RideAnalyticsRepositoryError,
};
use crate::domain::{DailyRideCount, DriverSummary, Error, StatusCount, UserId, UserSpending};

fn map_analytics_error(error: RideAnalyticsRepositoryError) -> Error {
    match error {
        RideAnalyticsRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ride analytics unavailable: {message}"))
        }
        RideAnalyticsRepositoryError::Query { message } => {
            Error::internal(format!("ride analytics error: {message}"))
        }
    }
}

/// Analytics service implementing [`RideAnalyticsQuery`].
#[derive(Clone)]
pub struct RideAnalyticsService<A> {
    analytics: Arc<A>,
}

impl<A> RideAnalyticsService<A> {
    pub fn new(analytics: Arc<A>) -> Self {
        Self { analytics }
    }
}

#[async_trait]
impl<A: RideAnalyticsRepository> RideAnalyticsQuery for RideAnalyticsService<A> {
    async fn driver_earnings(&self, driver_id: UserId) -> Result<f64, Error> {
        self.analytics
            .completed_earnings(&driver_id)
            .await
            .map_err(map_analytics_error)
    }

    async fn rides_per_day(&self) -> Result<Vec<DailyRideCount>, Error> {
        self.analytics
            .daily_ride_counts()
            .await
            .map_err(map_analytics_error)
    }

    async fn driver_summary(&self, driver_id: UserId) -> Result<DriverSummary, Error> {
        self.analytics
            .driver_summary(&driver_id)
            .await
            .map_err(map_analytics_error)
    }

    async fn user_spending(&self, user_id: UserId) -> Result<UserSpending, Error> {
        self.analytics
            .user_spending(&user_id)
            .await
            .map_err(map_analytics_error)
    }

    async fn status_summary(&self) -> Result<Vec<StatusCount>, Error> {
        self.analytics
            .status_counts()
            .await
            .map_err(map_analytics_error)
    }
}
