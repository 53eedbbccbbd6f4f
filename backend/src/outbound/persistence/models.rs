//! Row types for the `users` and `rides` tables.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date};
use uuid::Uuid;

use super::schema::{rides, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

/// Full ride row, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = rides)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RideRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub pickup_location: String,
    pub drop_location: String,
    pub distance_km: f64,
    pub fare: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Every mutable ride column. A `None` driver clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = rides)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RideChangeset<'a> {
    pub user_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub pickup_location: &'a str,
    pub drop_location: &'a str,
    pub distance_km: f64,
    pub fare: f64,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Result row of the rides-per-day aggregation.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct DailyCountRow {
    #[diesel(sql_type = Date)]
    pub day: NaiveDate,
    #[diesel(sql_type = BigInt)]
    pub rides: i64,
}
