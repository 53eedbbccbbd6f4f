//! Store-agnostic ride query specification.
//!
//! A [`RideQuerySpec`] is a conjunction of [`RideFilter`] predicates with an
//! optional sort and page window. Storage adapters translate it into their
//! native query language; [`RideQuerySpec::evaluate`] is the reference
//! evaluation over an in-memory slice.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

use super::{Ride, RideStatus, UserId};

/// Default page size when a caller omits `size`.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validation failures while assembling a query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RideQueryError {
    #[error("unknown sort field '{value}'")]
    UnknownSortField { value: String },
    #[error("page size must be between 1 and {max}")]
    PageSizeOutOfRange { max: u32 },
    #[error("distance bounds must be finite numbers")]
    NonFiniteDistance,
}

/// Half-open UTC instant range covering whole calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    start: DateTime<Utc>,
    end_exclusive: DateTime<Utc>,
}

impl DayRange {
    /// Range from the start of `start` up to, but excluding, the start of the
    /// day after `end`. A reversed range matches nothing.
    ///
    /// # Examples
    /// ```
    /// use chrono::{NaiveDate, TimeZone, Utc};
    /// use rideshare::domain::DayRange;
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    /// let range = DayRange::inclusive(day, day);
    /// assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap()));
    /// assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()));
    /// ```
    #[must_use]
    pub fn inclusive(start: NaiveDate, end: NaiveDate) -> Self {
        let end_exclusive = end
            .checked_add_days(Days::new(1))
            .map_or(DateTime::<Utc>::MAX_UTC, start_of_day);
        Self {
            start: start_of_day(start),
            end_exclusive,
        }
    }

    /// The single calendar day `day`.
    #[must_use]
    pub fn single(day: NaiveDate) -> Self {
        Self::inclusive(day, day)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end_exclusive(&self) -> DateTime<Utc> {
        self.end_exclusive
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end_exclusive
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end_exclusive
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Single predicate over rides.
#[derive(Debug, Clone, PartialEq)]
pub enum RideFilter {
    /// Case-insensitive substring of the pickup or drop location.
    Keyword(String),
    /// Distance within `[min, max]`.
    DistanceBetween { min: f64, max: f64 },
    CreatedWithin(DayRange),
    Passenger(UserId),
    Driver(UserId),
    Status(RideStatus),
}

impl RideFilter {
    /// Distance filter with finite bounds. `min > max` yields an empty match.
    pub fn distance_between(min: f64, max: f64) -> Result<Self, RideQueryError> {
        if !(min.is_finite() && max.is_finite()) {
            return Err(RideQueryError::NonFiniteDistance);
        }
        Ok(Self::DistanceBetween { min, max })
    }

    pub fn matches(&self, ride: &Ride) -> bool {
        match self {
            Self::Keyword(keyword) => {
                let needle = keyword.to_lowercase();
                ride.pickup_location().to_lowercase().contains(&needle)
                    || ride.drop_location().to_lowercase().contains(&needle)
            }
            Self::DistanceBetween { min, max } => {
                *min <= ride.distance_km() && ride.distance_km() <= *max
            }
            Self::CreatedWithin(range) => range.contains(ride.created_at()),
            Self::Passenger(id) => ride.passenger_id() == *id,
            Self::Driver(id) => ride.driver_id() == Some(*id),
            Self::Status(status) => ride.status() == *status,
        }
    }
}

/// Sortable ride attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Fare,
    DistanceKm,
    CreatedAt,
    Status,
    PickupLocation,
    DropLocation,
}

impl SortField {
    const ALL: [Self; 6] = [
        Self::Fare,
        Self::DistanceKm,
        Self::CreatedAt,
        Self::Status,
        Self::PickupLocation,
        Self::DropLocation,
    ];

    /// Wire name, matching the ride JSON field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fare => "fare",
            Self::DistanceKm => "distanceKm",
            Self::CreatedAt => "createdAt",
            Self::Status => "status",
            Self::PickupLocation => "pickupLocation",
            Self::DropLocation => "dropLocation",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = RideQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "");
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| RideQueryError::UnknownSortField {
                value: s.trim().to_owned(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// `asc` in any letter case is ascending; anything else is descending.
    #[must_use]
    pub fn parse(order: &str) -> Self {
        if order.trim().eq_ignore_ascii_case("asc") {
            Self::Ascending
        } else {
            Self::Descending
        }
    }
}

fn case_folded(text: &str) -> String {
    text.to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RideSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl RideSort {
    #[must_use]
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Ordering of `a` relative to `b` under this sort. Locations compare
    /// case-insensitively.
    pub fn compare(&self, a: &Ride, b: &Ride) -> Ordering {
        let ordering = match self.field {
            SortField::Fare => a.fare().total_cmp(&b.fare()),
            SortField::DistanceKm => a.distance_km().total_cmp(&b.distance_km()),
            SortField::CreatedAt => a.created_at().cmp(&b.created_at()),
            SortField::Status => a.status().as_str().cmp(b.status().as_str()),
            SortField::PickupLocation => {
                case_folded(a.pickup_location()).cmp(&case_folded(b.pickup_location()))
            }
            SortField::DropLocation => {
                case_folded(a.drop_location()).cmp(&case_folded(b.drop_location()))
            }
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Zero-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Apply defaults (page 0, size [`DEFAULT_PAGE_SIZE`]) and bounds.
    pub fn try_new(page: Option<u32>, size: Option<u32>) -> Result<Self, RideQueryError> {
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(RideQueryError::PageSizeOutOfRange { max: MAX_PAGE_SIZE });
        }
        Ok(Self {
            page: page.unwrap_or(0),
            size,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// Conjunction of filters with optional ordering and paging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RideQuerySpec {
    filters: Vec<RideFilter>,
    sort: Option<RideSort>,
    page: Option<PageRequest>,
}

impl RideQuerySpec {
    /// Matches every ride in store order.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, filter: RideFilter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn with_optional(self, filter: Option<RideFilter>) -> Self {
        match filter {
            Some(filter) => self.with(filter),
            None => self,
        }
    }

    #[must_use]
    pub fn sorted_by(mut self, sort: RideSort) -> Self {
        self.sort = Some(sort);
        self
    }

    #[must_use]
    pub fn paged(mut self, page: PageRequest) -> Self {
        self.page = Some(page);
        self
    }

    pub fn filters(&self) -> &[RideFilter] {
        &self.filters
    }

    pub fn sort(&self) -> Option<RideSort> {
        self.sort
    }

    pub fn page(&self) -> Option<PageRequest> {
        self.page
    }

    pub fn matches(&self, ride: &Ride) -> bool {
        self.filters.iter().all(|filter| filter.matches(ride))
    }

    /// Filter, sort and page `rides`, keeping input order for ties.
    pub fn evaluate<I>(&self, rides: I) -> Vec<Ride>
    where
        I: IntoIterator<Item = Ride>,
    {
        let mut selected: Vec<Ride> = rides.into_iter().filter(|r| self.matches(r)).collect();
        if let Some(sort) = self.sort {
            selected.sort_by(|a, b| sort.compare(a, b));
        }
        match self.page {
            Some(page) => {
                let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
                selected
                    .into_iter()
                    .skip(offset)
                    .take(page.size() as usize)
                    .collect()
            }
            None => selected,
        }
    }
}
