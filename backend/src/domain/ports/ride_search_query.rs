//! Driving port for read-only ride searches.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Error, PageRequest, Ride, RideQueryError, RideSort, RideStatus, RideValidationError,
    SortDirection, SortField, UserId,
};

/// Failures while normalising advanced search parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdvancedSearchError {
    #[error(transparent)]
    Query(#[from] RideQueryError),
    #[error(transparent)]
    Status(#[from] RideValidationError),
}

/// Normalised multi-criteria search.
///
/// Blank `search` or `status` values are dropped rather than matched.
/// `order` defaults to ascending and only applies when `sort` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvancedSearch {
    pub keyword: Option<String>,
    pub status: Option<RideStatus>,
    pub sort: Option<RideSort>,
    pub page: PageRequest,
}

impl AdvancedSearch {
    /// # Examples
    /// ```
    /// use rideshare::domain::ports::AdvancedSearch;
    /// use rideshare::domain::RideStatus;
    ///
    /// let search =
    ///     AdvancedSearch::try_from_parts(Some("  "), Some("accepted"), None, None, None, None)
    ///         .unwrap();
    /// assert!(search.keyword.is_none());
    /// assert_eq!(search.status, Some(RideStatus::Accepted));
    /// assert_eq!(search.page.size(), 10);
    /// ```
    pub fn try_from_parts(
        search: Option<&str>,
        status: Option<&str>,
        sort: Option<&str>,
        order: Option<&str>,
        page: Option<u32>,
        size: Option<u32>,
    ) -> Result<Self, AdvancedSearchError> {
        let keyword = non_blank(search).map(str::to_owned);
        let status = non_blank(status).map(str::parse::<RideStatus>).transpose()?;
        let sort = non_blank(sort)
            .map(str::parse::<SortField>)
            .transpose()?
            .map(|field| RideSort::new(field, SortDirection::parse(order.unwrap_or("asc"))));
        let page = PageRequest::try_new(page, size)?;
        Ok(Self {
            keyword,
            status,
            sort,
            page,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RideSearchQuery: Send + Sync {
    /// Case-insensitive substring match on pickup or drop location.
    async fn search(&self, text: String) -> Result<Vec<Ride>, Error>;

    /// Distance within `[min, max]` kilometres.
    async fn filter_by_distance(&self, min: f64, max: f64) -> Result<Vec<Ride>, Error>;

    /// Created between the start of `start` and the end of `end` (UTC).
    async fn filter_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Ride>, Error>;

    /// All rides ordered by fare.
    async fn sort_by_fare(&self, direction: SortDirection) -> Result<Vec<Ride>, Error>;

    async fn rides_by_user(&self, user_id: UserId) -> Result<Vec<Ride>, Error>;

    async fn rides_by_user_and_status(
        &self,
        user_id: UserId,
        status: RideStatus,
    ) -> Result<Vec<Ride>, Error>;

    /// `ACCEPTED` rides assigned to `driver_id`.
    async fn driver_active_rides(&self, driver_id: UserId) -> Result<Vec<Ride>, Error>;

    async fn filter_by_status_and_keyword(
        &self,
        status: RideStatus,
        text: String,
    ) -> Result<Vec<Ride>, Error>;

    async fn advanced_search(&self, search: AdvancedSearch) -> Result<Vec<Ride>, Error>;

    /// Rides created on the UTC calendar day `date`.
    async fn rides_on_date(&self, date: NaiveDate) -> Result<Vec<Ride>, Error>;
}
