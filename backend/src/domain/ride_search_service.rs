//! Read-only ride searches expressed as [`RideQuerySpec`] values.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{AdvancedSearch, RideRepository, RideSearchQuery};
use crate::domain::ride_lifecycle_service::map_ride_error;
use crate::domain::{
    DayRange, Error, Ride, RideFilter, RideQuerySpec, RideSort, RideStatus, SortDirection,
    SortField, UserId,
};

/// Search service implementing [`RideSearchQuery`].
#[derive(Clone)]
pub struct RideSearchService<R> {
    rides: Arc<R>,
}

impl<R> RideSearchService<R> {
    pub fn new(rides: Arc<R>) -> Self {
        Self { rides }
    }
}

impl<R: RideRepository> RideSearchService<R> {
    async fn run(&self, spec: RideQuerySpec) -> Result<Vec<Ride>, Error> {
        self.rides.find(&spec).await.map_err(map_ride_error)
    }
}

#[async_trait]
impl<R: RideRepository> RideSearchQuery for RideSearchService<R> {
    async fn search(&self, text: String) -> Result<Vec<Ride>, Error> {
        self.run(RideQuerySpec::all().with(RideFilter::Keyword(text)))
            .await
    }

    async fn filter_by_distance(&self, min: f64, max: f64) -> Result<Vec<Ride>, Error> {
        let filter = RideFilter::distance_between(min, max)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.run(RideQuerySpec::all().with(filter)).await
    }

    async fn filter_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Ride>, Error> {
        let range = DayRange::inclusive(start, end);
        self.run(RideQuerySpec::all().with(RideFilter::CreatedWithin(range)))
            .await
    }

    async fn sort_by_fare(&self, direction: SortDirection) -> Result<Vec<Ride>, Error> {
        self.run(RideQuerySpec::all().sorted_by(RideSort::new(SortField::Fare, direction)))
            .await
    }

    async fn rides_by_user(&self, user_id: UserId) -> Result<Vec<Ride>, Error> {
        self.run(RideQuerySpec::all().with(RideFilter::Passenger(user_id)))
            .await
    }

    async fn rides_by_user_and_status(
        &self,
        user_id: UserId,
        status: RideStatus,
    ) -> Result<Vec<Ride>, Error> {
        let spec = RideQuerySpec::all()
            .with(RideFilter::Passenger(user_id))
            .with(RideFilter::Status(status));
        self.run(spec).await
    }

    async fn driver_active_rides(&self, driver_id: UserId) -> Result<Vec<Ride>, Error> {
        let spec = RideQuerySpec::all()
            .with(RideFilter::Driver(driver_id))
            .with(RideFilter::Status(RideStatus::Accepted));
        self.run(spec).await
    }

    async fn filter_by_status_and_keyword(
        &self,
        status: RideStatus,
        text: String,
    ) -> Result<Vec<Ride>, Error> {
        let spec = RideQuerySpec::all()
            .with(RideFilter::Status(status))
            .with(RideFilter::Keyword(text));
        self.run(spec).await
    }

    async fn advanced_search(&self, search: AdvancedSearch) -> Result<Vec<Ride>, Error> {
        let AdvancedSearch {
            keyword,
            status,
            sort,
            page,
        } = search;
        let mut spec = RideQuerySpec::all()
            .with_optional(keyword.map(RideFilter::Keyword))
            .with_optional(status.map(RideFilter::Status))
            .paged(page);
        if let Some(sort) = sort {
            spec = spec.sorted_by(sort);
        }
        self.run(spec).await
    }

    async fn rides_on_date(&self, date: NaiveDate) -> Result<Vec<Ride>, Error> {
        self.filter_by_date_range(date, date).await
    }
}
