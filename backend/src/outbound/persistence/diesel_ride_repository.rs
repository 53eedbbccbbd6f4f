//! PostgreSQL-backed [`RideRepository`] and [`RideAnalyticsRepository`].
//!
//! [`RideQuerySpec`] values are translated into boxed Diesel queries here;
//! no other module knows about SQL.

use async_trait::async_trait;
use diesel::dsl::{count_star, sum};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    RideAnalyticsRepository, RideAnalyticsRepositoryError, RideRepository, RideRepositoryError,
};
use crate::domain::{
    DailyRideCount, DriverSummary, Ride, RideFilter, RideId, RideQuerySpec, RideRecord, RideSort,
    RideStatus, SortDirection, SortField, StatusCount, UserId, UserSpending,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{DailyCountRow, RideChangeset, RideRow};
use super::pool::{DbPool, PoolError};
use super::schema::rides;

const COMPLETED: &str = RideStatus::Completed.as_str();

diesel::define_sql_function! {
    /// Text sorts compare case-folded values, as the in-memory store does.
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

#[derive(Clone)]
pub struct DieselRideRepository {
    pool: DbPool,
}

impl DieselRideRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RideRepositoryError {
    map_basic_pool_error(error, RideRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RideRepositoryError {
    map_basic_diesel_error(
        &error,
        RideRepositoryError::query,
        RideRepositoryError::connection,
    )
}

fn map_analytics_pool_error(error: PoolError) -> RideAnalyticsRepositoryError {
    map_basic_pool_error(error, RideAnalyticsRepositoryError::connection)
}

fn map_analytics_diesel_error(error: diesel::result::Error) -> RideAnalyticsRepositoryError {
    map_basic_diesel_error(
        &error,
        RideAnalyticsRepositoryError::query,
        RideAnalyticsRepositoryError::connection,
    )
}

fn to_row(ride: &Ride) -> RideRow {
    RideRow {
        id: *ride.id().as_uuid(),
        user_id: *ride.passenger_id().as_uuid(),
        driver_id: ride.driver_id().map(|id| *id.as_uuid()),
        pickup_location: ride.pickup_location().to_owned(),
        drop_location: ride.drop_location().to_owned(),
        distance_km: ride.distance_km(),
        fare: ride.fare(),
        status: ride.status().as_str().to_owned(),
        created_at: ride.created_at(),
    }
}

fn to_changeset(ride: &Ride) -> RideChangeset<'_> {
    RideChangeset {
        user_id: *ride.passenger_id().as_uuid(),
        driver_id: ride.driver_id().map(|id| *id.as_uuid()),
        pickup_location: ride.pickup_location(),
        drop_location: ride.drop_location(),
        distance_km: ride.distance_km(),
        fare: ride.fare(),
        status: ride.status().as_str(),
        created_at: ride.created_at(),
    }
}

fn row_to_ride(row: RideRow) -> Result<Ride, RideRepositoryError> {
    let status = row
        .status
        .parse::<RideStatus>()
        .map_err(|err| RideRepositoryError::query(format!("stored ride {}: {err}", row.id)))?;
    let id = row.id;
    Ride::try_from(RideRecord {
        id: RideId::from_uuid(row.id),
        passenger_id: UserId::from_uuid(row.user_id),
        driver_id: row.driver_id.map(UserId::from_uuid),
        pickup_location: row.pickup_location,
        drop_location: row.drop_location,
        distance_km: row.distance_km,
        fare: row.fare,
        status,
        created_at: row.created_at,
    })
    .map_err(|err| RideRepositoryError::query(format!("stored ride {id}: {err}")))
}

/// Escape `LIKE` metacharacters; PostgreSQL's default escape is `\`.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

type RideQuery = rides::BoxedQuery<'static, Pg>;

fn apply_filter(query: RideQuery, filter: &RideFilter) -> RideQuery {
    match filter {
        RideFilter::Keyword(keyword) => {
            let pattern = like_pattern(keyword);
            query.filter(
                rides::pickup_location
                    .ilike(pattern.clone())
                    .or(rides::drop_location.ilike(pattern)),
            )
        }
        RideFilter::DistanceBetween { min, max } => {
            query.filter(rides::distance_km.between(*min, *max))
        }
        RideFilter::CreatedWithin(range) => query
            .filter(rides::created_at.ge(range.start()))
            .filter(rides::created_at.lt(range.end_exclusive())),
        RideFilter::Passenger(id) => query.filter(rides::user_id.eq(*id.as_uuid())),
        RideFilter::Driver(id) => query.filter(rides::driver_id.eq(*id.as_uuid())),
        RideFilter::Status(status) => query.filter(rides::status.eq(status.as_str())),
    }
}

macro_rules! order_by_column {
    ($query:expr, $column:expr, $direction:expr) => {
        match $direction {
            SortDirection::Ascending => $query.order_by($column.asc()),
            SortDirection::Descending => $query.order_by($column.desc()),
        }
    };
}

fn apply_sort(query: RideQuery, sort: Option<RideSort>) -> RideQuery {
    let Some(RideSort { field, direction }) = sort else {
        return query.order_by((rides::created_at.asc(), rides::id.asc()));
    };
    let ordered = match field {
        SortField::Fare => order_by_column!(query, rides::fare, direction),
        SortField::DistanceKm => order_by_column!(query, rides::distance_km, direction),
        SortField::CreatedAt => order_by_column!(query, rides::created_at, direction),
        SortField::Status => order_by_column!(query, rides::status, direction),
        SortField::PickupLocation => {
            order_by_column!(query, lower(rides::pickup_location), direction)
        }
        SortField::DropLocation => order_by_column!(query, lower(rides::drop_location), direction),
    };
    ordered.then_order_by(rides::id.asc())
}

/// Translate a query specification into a single boxed `SELECT`.
///
/// Without an explicit sort, rides come back in creation order.
fn build_query(spec: &RideQuerySpec) -> Result<RideQuery, RideRepositoryError> {
    let filtered = spec
        .filters()
        .iter()
        .fold(rides::table.into_boxed(), apply_filter);
    let mut query = apply_sort(filtered, spec.sort());
    if let Some(page) = spec.page() {
        let offset = i64::try_from(page.offset())
            .map_err(|_| RideRepositoryError::query("page offset out of range"))?;
        query = query.offset(offset).limit(i64::from(page.size()));
    }
    Ok(query)
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[async_trait]
impl RideRepository for DieselRideRepository {
    async fn insert(&self, ride: &Ride) -> Result<(), RideRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(rides::table)
            .values(&to_row(ride))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &RideId) -> Result<Option<Ride>, RideRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = rides::table
            .filter(rides::id.eq(id.as_uuid()))
            .select(RideRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_ride).transpose()
    }

    async fn compare_and_set(
        &self,
        ride: &Ride,
        expected: RideStatus,
    ) -> Result<bool, RideRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ride_id = *ride.id().as_uuid();
        let target = rides::table
            .filter(rides::id.eq(ride_id))
            .filter(rides::status.eq(expected.as_str()));
        let updated = diesel::update(target)
            .set(&to_changeset(ride))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated == 1)
    }

    async fn find(&self, spec: &RideQuerySpec) -> Result<Vec<Ride>, RideRepositoryError> {
        let query = build_query(spec)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RideRow> = query
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_ride).collect()
    }

    async fn ping(&self) -> Result<(), RideRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[async_trait]
impl RideAnalyticsRepository for DieselRideRepository {
    async fn completed_earnings(
        &self,
        driver_id: &UserId,
    ) -> Result<f64, RideAnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_analytics_pool_error)?;
        let total: Option<f64> = rides::table
            .filter(rides::driver_id.eq(driver_id.as_uuid()))
            .filter(rides::status.eq(COMPLETED))
            .select(sum(rides::fare))
            .first(&mut conn)
            .await
            .map_err(map_analytics_diesel_error)?;
        Ok(total.unwrap_or(0.0))
    }

    async fn daily_ride_counts(
        &self,
    ) -> Result<Vec<DailyRideCount>, RideAnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_analytics_pool_error)?;
        let rows: Vec<DailyCountRow> = diesel::sql_query(
            "SELECT (created_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS rides \
             FROM rides GROUP BY day ORDER BY day",
        )
        .load(&mut conn)
        .await
        .map_err(map_analytics_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| DailyRideCount {
                date: row.day,
                count: count(row.rides),
            })
            .collect())
    }

    async fn driver_summary(
        &self,
        driver_id: &UserId,
    ) -> Result<DriverSummary, RideAnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_analytics_pool_error)?;
        let (rides_done, earnings, distance): (i64, Option<f64>, Option<f64>) = rides::table
            .filter(rides::driver_id.eq(driver_id.as_uuid()))
            .filter(rides::status.eq(COMPLETED))
            .select((count_star(), sum(rides::fare), sum(rides::distance_km)))
            .first(&mut conn)
            .await
            .map_err(map_analytics_diesel_error)?;
        Ok(DriverSummary::from_totals(
            *driver_id,
            count(rides_done),
            earnings.unwrap_or(0.0),
            distance.unwrap_or(0.0),
        ))
    }

    async fn user_spending(
        &self,
        user_id: &UserId,
    ) -> Result<UserSpending, RideAnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_analytics_pool_error)?;
        let (total_rides, spent): (i64, Option<f64>) = rides::table
            .filter(rides::user_id.eq(user_id.as_uuid()))
            .filter(rides::status.eq(COMPLETED))
            .select((count_star(), sum(rides::fare)))
            .first(&mut conn)
            .await
            .map_err(map_analytics_diesel_error)?;
        Ok(UserSpending {
            user_id: *user_id,
            total_rides: count(total_rides),
            total_spent: spent.unwrap_or(0.0),
        })
    }

    async fn status_counts(&self) -> Result<Vec<StatusCount>, RideAnalyticsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_analytics_pool_error)?;
        let rows: Vec<(String, i64)> = rides::table
            .group_by(rides::status)
            .select((rides::status, count_star()))
            .load(&mut conn)
            .await
            .map_err(map_analytics_diesel_error)?;
        let mut counts = rows
            .into_iter()
            .map(|(status, n)| {
                status
                    .parse::<RideStatus>()
                    .map(|status| StatusCount {
                        status,
                        count: count(n),
                    })
                    .map_err(|err| RideAnalyticsRepositoryError::query(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        counts.sort_by_key(|c| c.status);
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DayRange, PageRequest, RideDraft};
    use chrono::{NaiveDate, Utc};
    use diesel::debug_query;
    use rstest::rstest;

    fn sql(spec: &RideQuerySpec) -> String {
        let query = build_query(spec).expect("query builds");
        debug_query::<Pg, _>(&query).to_string()
    }

    #[rstest]
    #[case("50%_off", "%50\\%\\_off%")]
    #[case("back\\slash", "%back\\\\slash%")]
    #[case("plain", "%plain%")]
    fn like_pattern_escapes_metacharacters(#[case] keyword: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(keyword), expected);
    }

    #[rstest]
    fn keyword_filter_uses_ilike_on_both_locations() {
        let text = sql(&RideQuerySpec::all().with(RideFilter::Keyword("dock".into())));
        assert!(text.contains("\"rides\".\"pickup_location\" ILIKE"));
        assert!(text.contains("\"rides\".\"drop_location\" ILIKE"));
    }

    #[rstest]
    fn date_filter_is_half_open() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 31).expect("date");
        let range = DayRange::single(day);
        let text = sql(&RideQuerySpec::all().with(RideFilter::CreatedWithin(range)));
        assert!(text.contains("\"rides\".\"created_at\" >="));
        assert!(text.contains("\"rides\".\"created_at\" <"));
    }

    #[rstest]
    fn paging_adds_limit_and_offset() {
        let page = PageRequest::try_new(Some(2), Some(5)).expect("page");
        let spec = RideQuerySpec::all()
            .sorted_by(RideSort::new(SortField::Fare, SortDirection::Descending))
            .paged(page);
        let text = sql(&spec);
        assert!(text.contains("ORDER BY \"rides\".\"fare\" DESC"));
        assert!(text.contains("LIMIT"));
        assert!(text.contains("OFFSET"));
    }

    #[rstest]
    fn rows_round_trip_through_domain() {
        let draft = RideDraft::try_new("A", "B", Some(1.5), Some(3.0)).expect("draft");
        let ride = Ride::request(RideId::random(), UserId::random(), draft, Utc::now())
            .accept(UserId::random())
            .expect("accept");
        let restored = row_to_ride(to_row(&ride)).expect("valid row");
        assert_eq!(restored, ride);
    }

    #[rstest]
    fn corrupt_rows_are_query_errors() {
        let draft = RideDraft::try_new("A", "B", None, None).expect("draft");
        let ride = Ride::request(RideId::random(), UserId::random(), draft, Utc::now());
        let mut row = to_row(&ride);
        row.status = "ACCEPTED".to_owned();
        assert!(matches!(row_to_ride(row), Err(RideRepositoryError::Query { .. })));
    }
}
