//! Ride aggregate and its lifecycle state machine.
//!
//! A ride moves `REQUESTED -> ACCEPTED -> COMPLETED` and never backwards. The
//! assigned driver lives inside the state so a requested ride cannot carry a
//! driver and an accepted or completed ride cannot lack one.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Stable ride identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RideId(Uuid);

impl RideId {
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RideId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Lifecycle status as stored and exchanged on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideStatus {
    Requested,
    Accepted,
    Completed,
}

impl RideStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Requested, Self::Accepted, Self::Completed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Accepted => "ACCEPTED",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RideStatus {
    type Err = RideValidationError;

    /// Parses status names case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RideValidationError::UnknownStatus {
                value: trimmed.to_owned(),
            })
    }
}

/// Validation failures when building or rehydrating a ride.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RideValidationError {
    #[error("pickupLocation must not be blank")]
    BlankPickup,
    #[error("dropLocation must not be blank")]
    BlankDrop,
    #[error("distanceKm must be a finite, non-negative number")]
    InvalidDistance,
    #[error("fare must be a finite, non-negative number")]
    InvalidFare,
    #[error("unknown ride status '{value}'")]
    UnknownStatus { value: String },
    #[error("a {status} ride must have a driver")]
    MissingDriver { status: RideStatus },
    #[error("a REQUESTED ride must not have a driver")]
    UnexpectedDriver,
}

/// Rejected lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RideTransitionError {
    #[error("ride is {current}; only REQUESTED rides can be accepted")]
    NotRequested { current: RideStatus },
    #[error("ride is {current}; only ACCEPTED rides can be completed")]
    NotAccepted { current: RideStatus },
}

impl RideTransitionError {
    /// Status the ride held when the transition was attempted.
    pub fn current(&self) -> RideStatus {
        match self {
            Self::NotRequested { current } | Self::NotAccepted { current } => *current,
        }
    }
}

/// Validated passenger input for a new ride.
#[derive(Debug, Clone, PartialEq)]
pub struct RideDraft {
    pickup_location: String,
    drop_location: String,
    distance_km: f64,
    fare: f64,
}

impl RideDraft {
    /// Validate raw request fields. Missing distance or fare default to zero.
    ///
    /// # Examples
    /// ```
    /// use rideshare::domain::RideDraft;
    ///
    /// let draft = RideDraft::try_new("A", "B", None, Some(12.5)).unwrap();
    /// assert_eq!(draft.fare(), 12.5);
    /// assert_eq!(draft.distance_km(), 0.0);
    /// ```
    pub fn try_new(
        pickup_location: &str,
        drop_location: &str,
        distance_km: Option<f64>,
        fare: Option<f64>,
    ) -> Result<Self, RideValidationError> {
        let pickup = pickup_location.trim();
        if pickup.is_empty() {
            return Err(RideValidationError::BlankPickup);
        }
        let drop = drop_location.trim();
        if drop.is_empty() {
            return Err(RideValidationError::BlankDrop);
        }
        let distance_km = non_negative(distance_km.unwrap_or(0.0))
            .ok_or(RideValidationError::InvalidDistance)?;
        let fare = non_negative(fare.unwrap_or(0.0)).ok_or(RideValidationError::InvalidFare)?;
        Ok(Self {
            pickup_location: pickup.to_owned(),
            drop_location: drop.to_owned(),
            distance_km,
            fare,
        })
    }

    pub fn pickup_location(&self) -> &str {
        &self.pickup_location
    }

    pub fn drop_location(&self) -> &str {
        &self.drop_location
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn fare(&self) -> f64 {
        self.fare
    }
}

fn non_negative(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RideState {
    Requested,
    Accepted { driver_id: UserId },
    Completed { driver_id: UserId },
}

/// Flat ride representation shared by storage adapters and the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideRecord {
    pub id: RideId,
    #[serde(rename = "userId")]
    pub passenger_id: UserId,
    pub driver_id: Option<UserId>,
    pub pickup_location: String,
    pub drop_location: String,
    pub distance_km: f64,
    pub fare: f64,
    pub status: RideStatus,
    pub created_at: DateTime<Utc>,
}

/// A ride tracked from request to completion.
///
/// ## Invariants
/// - The driver is absent if and only if the status is `REQUESTED`.
/// - Transitions only move forward one step at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RideRecord", into = "RideRecord")]
pub struct Ride {
    id: RideId,
    passenger_id: UserId,
    pickup_location: String,
    drop_location: String,
    distance_km: f64,
    fare: f64,
    created_at: DateTime<Utc>,
    state: RideState,
}

impl Ride {
    /// Open a new ride in `REQUESTED` status with no driver.
    #[must_use]
    pub fn request(
        id: RideId,
        passenger_id: UserId,
        draft: RideDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        let RideDraft {
            pickup_location,
            drop_location,
            distance_km,
            fare,
        } = draft;
        Self {
            id,
            passenger_id,
            pickup_location,
            drop_location,
            distance_km,
            fare,
            created_at,
            state: RideState::Requested,
        }
    }

    /// Assign `driver_id` to a requested ride.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use rideshare::domain::{Ride, RideDraft, RideId, RideStatus, UserId};
    ///
    /// let draft = RideDraft::try_new("A", "B", None, None).unwrap();
    /// let ride = Ride::request(RideId::random(), UserId::random(), draft, Utc::now());
    /// let driver = UserId::random();
    /// let accepted = ride.accept(driver).unwrap();
    /// assert_eq!(accepted.status(), RideStatus::Accepted);
    /// assert_eq!(accepted.driver_id(), Some(driver));
    /// assert!(accepted.accept(driver).is_err());
    /// ```
    pub fn accept(&self, driver_id: UserId) -> Result<Self, RideTransitionError> {
        match self.state {
            RideState::Requested => Ok(self.with_state(RideState::Accepted { driver_id })),
            _ => Err(RideTransitionError::NotRequested {
                current: self.status(),
            }),
        }
    }

    /// Close an accepted ride. The assigned driver is kept.
    pub fn complete(&self) -> Result<Self, RideTransitionError> {
        match self.state {
            RideState::Accepted { driver_id } => {
                Ok(self.with_state(RideState::Completed { driver_id }))
            }
            _ => Err(RideTransitionError::NotAccepted {
                current: self.status(),
            }),
        }
    }

    fn with_state(&self, state: RideState) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }

    pub fn id(&self) -> RideId {
        self.id
    }

    pub fn passenger_id(&self) -> UserId {
        self.passenger_id
    }

    pub fn driver_id(&self) -> Option<UserId> {
        match self.state {
            RideState::Requested => None,
            RideState::Accepted { driver_id } | RideState::Completed { driver_id } => {
                Some(driver_id)
            }
        }
    }

    pub fn status(&self) -> RideStatus {
        match self.state {
            RideState::Requested => RideStatus::Requested,
            RideState::Accepted { .. } => RideStatus::Accepted,
            RideState::Completed { .. } => RideStatus::Completed,
        }
    }

    pub fn pickup_location(&self) -> &str {
        &self.pickup_location
    }

    pub fn drop_location(&self) -> &str {
        &self.drop_location
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn fare(&self) -> f64 {
        self.fare
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True when `user_id` is this ride's passenger or assigned driver.
    pub fn involves(&self, user_id: UserId) -> bool {
        self.passenger_id == user_id || self.driver_id() == Some(user_id)
    }
}

impl TryFrom<RideRecord> for Ride {
    type Error = RideValidationError;

    fn try_from(record: RideRecord) -> Result<Self, Self::Error> {
        let state = match (record.status, record.driver_id) {
            (RideStatus::Requested, None) => RideState::Requested,
            (RideStatus::Requested, Some(_)) => return Err(RideValidationError::UnexpectedDriver),
            (RideStatus::Accepted, Some(driver_id)) => RideState::Accepted { driver_id },
            (RideStatus::Completed, Some(driver_id)) => RideState::Completed { driver_id },
            (status, None) => return Err(RideValidationError::MissingDriver { status }),
        };
        Ok(Self {
            id: record.id,
            passenger_id: record.passenger_id,
            pickup_location: record.pickup_location,
            drop_location: record.drop_location,
            distance_km: record.distance_km,
            fare: record.fare,
            created_at: record.created_at,
            state,
        })
    }
}

impl From<Ride> for RideRecord {
    fn from(ride: Ride) -> Self {
        Self {
            id: ride.id,
            passenger_id: ride.passenger_id,
            driver_id: ride.driver_id(),
            status: ride.status(),
            pickup_location: ride.pickup_location,
            drop_location: ride.drop_location,
            distance_km: ride.distance_km,
            fare: ride.fare,
            created_at: ride.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn requested() -> Ride {
        let draft = RideDraft::try_new("A", "B", Some(4.2), Some(11.0)).expect("valid draft");
        let created_at = Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp");
        Ride::request(RideId::random(), UserId::random(), draft, created_at)
    }

    fn in_status(ride: Ride, status: RideStatus) -> Ride {
        match status {
            RideStatus::Requested => ride,
            RideStatus::Accepted => ride.accept(UserId::random()).expect("accept"),
            RideStatus::Completed => ride
                .accept(UserId::random())
                .and_then(|r| r.complete())
                .expect("complete"),
        }
    }

    #[rstest]
    fn new_ride_is_requested_without_driver(requested: Ride) {
        assert_eq!(requested.status(), RideStatus::Requested);
        assert!(requested.driver_id().is_none());
    }

    #[rstest]
    #[case(RideStatus::Requested)]
    #[case(RideStatus::Accepted)]
    #[case(RideStatus::Completed)]
    fn driver_absent_iff_requested(requested: Ride, #[case] status: RideStatus) {
        let ride = in_status(requested, status);
        assert_eq!(ride.driver_id().is_none(), ride.status() == RideStatus::Requested);
    }

    #[rstest]
    #[case(RideStatus::Accepted)]
    #[case(RideStatus::Completed)]
    fn accept_rejects_every_non_requested_status(requested: Ride, #[case] status: RideStatus) {
        let ride = in_status(requested, status);
        let err = ride.accept(UserId::random()).expect_err("must reject");
        assert_eq!(err, RideTransitionError::NotRequested { current: status });
    }

    #[rstest]
    #[case(RideStatus::Requested)]
    #[case(RideStatus::Completed)]
    fn complete_rejects_every_non_accepted_status(requested: Ride, #[case] status: RideStatus) {
        let ride = in_status(requested, status);
        let err = ride.complete().expect_err("must reject");
        assert_eq!(err, RideTransitionError::NotAccepted { current: status });
    }

    #[rstest]
    fn complete_keeps_driver(requested: Ride) {
        let driver = UserId::random();
        let done = requested
            .accept(driver)
            .and_then(|r| r.complete())
            .expect("lifecycle");
        assert_eq!(done.status(), RideStatus::Completed);
        assert_eq!(done.driver_id(), Some(driver));
    }

    #[rstest]
    fn involves_passenger_and_driver_only(requested: Ride) {
        let driver = UserId::random();
        let passenger = requested.passenger_id();
        let accepted = requested.accept(driver).expect("accept");
        assert!(accepted.involves(passenger));
        assert!(accepted.involves(driver));
        assert!(!accepted.involves(UserId::random()));
    }

    #[rstest]
    #[case(" ", "B", None, None, RideValidationError::BlankPickup)]
    #[case("A", "", None, None, RideValidationError::BlankDrop)]
    #[case("A", "B", Some(-1.0), None, RideValidationError::InvalidDistance)]
    #[case("A", "B", Some(f64::NAN), None, RideValidationError::InvalidDistance)]
    #[case("A", "B", None, Some(f64::INFINITY), RideValidationError::InvalidFare)]
    fn draft_rejects_invalid_fields(
        #[case] pickup: &str,
        #[case] drop: &str,
        #[case] distance: Option<f64>,
        #[case] fare: Option<f64>,
        #[case] expected: RideValidationError,
    ) {
        assert_eq!(RideDraft::try_new(pickup, drop, distance, fare), Err(expected));
    }

    #[rstest]
    #[case("REQUESTED", RideStatus::Requested)]
    #[case("accepted", RideStatus::Accepted)]
    #[case(" Completed ", RideStatus::Completed)]
    fn status_parses_case_insensitively(#[case] raw: &str, #[case] expected: RideStatus) {
        assert_eq!(raw.parse::<RideStatus>(), Ok(expected));
    }

    #[rstest]
    fn status_rejects_unknown_names() {
        assert!(matches!(
            "CANCELLED".parse::<RideStatus>(),
            Err(RideValidationError::UnknownStatus { .. })
        ));
    }

    #[rstest]
    fn record_rejects_driver_on_requested(requested: Ride) {
        let mut record = RideRecord::from(requested);
        record.driver_id = Some(UserId::random());
        assert_eq!(Ride::try_from(record), Err(RideValidationError::UnexpectedDriver));
    }

    #[rstest]
    fn record_rejects_accepted_without_driver(requested: Ride) {
        let mut record = RideRecord::from(requested);
        record.status = RideStatus::Accepted;
        assert_eq!(
            Ride::try_from(record),
            Err(RideValidationError::MissingDriver {
                status: RideStatus::Accepted
            })
        );
    }

    #[rstest]
    fn serialises_wire_shape(requested: Ride) {
        let value = serde_json::to_value(&requested).expect("serialise");
        assert_eq!(value.get("status"), Some(&json!("REQUESTED")));
        assert_eq!(value.get("driverId"), Some(&json!(null)));
        assert_eq!(
            value.get("userId"),
            Some(&json!(requested.passenger_id().to_string()))
        );
        assert_eq!(value.get("pickupLocation"), Some(&json!("A")));
        assert_eq!(value.get("distanceKm"), Some(&json!(4.2)));
    }
}
