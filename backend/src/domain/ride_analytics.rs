//! Aggregated ride statistics.
//!
//! Each type has a `from_rides` constructor giving the reference aggregation
//! over a slice; storage adapters may compute the same figures natively.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Ride, RideStatus, UserId};

/// Sum of fares over completed rides driven by `driver_id`. Zero when none.
pub fn completed_earnings(driver_id: UserId, rides: &[Ride]) -> f64 {
    completed_for_driver(driver_id, rides).map(Ride::fare).sum()
}

fn completed_for_driver(driver_id: UserId, rides: &[Ride]) -> impl Iterator<Item = &Ride> {
    rides
        .iter()
        .filter(move |r| r.status() == RideStatus::Completed && r.driver_id() == Some(driver_id))
}

/// Rides created on one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRideCount {
    /// Serialised as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub count: u64,
}

impl DailyRideCount {
    /// Counts per creation day, ascending by date.
    pub fn from_rides(rides: &[Ride]) -> Vec<Self> {
        let mut buckets: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for ride in rides {
            *buckets.entry(ride.created_at().date_naive()).or_default() += 1;
        }
        buckets
            .into_iter()
            .map(|(date, count)| Self { date, count })
            .collect()
    }
}

/// Completed-ride totals for one driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSummary {
    pub driver_id: UserId,
    pub completed_rides: u64,
    pub total_earnings: f64,
    /// Mean distance in kilometres; zero when there are no completed rides.
    pub avg_distance: f64,
}

impl DriverSummary {
    pub fn from_rides(driver_id: UserId, rides: &[Ride]) -> Self {
        let (count, earnings, distance) = completed_for_driver(driver_id, rides).fold(
            (0_u64, 0.0_f64, 0.0_f64),
            |(count, earnings, distance), ride| {
                (count + 1, earnings + ride.fare(), distance + ride.distance_km())
            },
        );
        Self::from_totals(driver_id, count, earnings, distance)
    }

    /// Build from raw totals, deriving the mean distance.
    #[expect(clippy::cast_precision_loss, reason = "ride counts stay far below 2^52")]
    pub fn from_totals(driver_id: UserId, completed_rides: u64, earnings: f64, distance: f64) -> Self {
        let avg_distance = if completed_rides == 0 {
            0.0
        } else {
            distance / completed_rides as f64
        };
        Self {
            driver_id,
            completed_rides,
            total_earnings: earnings,
            avg_distance,
        }
    }
}

/// Completed-ride spending for one passenger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSpending {
    pub user_id: UserId,
    pub total_rides: u64,
    pub total_spent: f64,
}

impl UserSpending {
    pub fn from_rides(user_id: UserId, rides: &[Ride]) -> Self {
        let (total_rides, total_spent) = rides
            .iter()
            .filter(|r| r.status() == RideStatus::Completed && r.passenger_id() == user_id)
            .fold((0_u64, 0.0_f64), |(count, spent), ride| {
                (count + 1, spent + ride.fare())
            });
        Self {
            user_id,
            total_rides,
            total_spent,
        }
    }
}

/// Number of rides currently in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: RideStatus,
    pub count: u64,
}

impl StatusCount {
    /// Counts for statuses that occur at least once, in lifecycle order.
    pub fn from_rides(rides: &[Ride]) -> Vec<Self> {
        let mut buckets: BTreeMap<RideStatus, u64> = BTreeMap::new();
        for ride in rides {
            *buckets.entry(ride.status()).or_default() += 1;
        }
        buckets
            .into_iter()
            .map(|(status, count)| Self { status, count })
            .collect()
    }
}
