//! PostgreSQL ride repository checks.
//!
//! These run only when `RIDESHARE_TEST_DATABASE_URL` points at a disposable
//! database; otherwise each test returns early.

use chrono::{TimeZone, Utc};

use rideshare::domain::ports::{RideAnalyticsRepository, RideRepository};
use rideshare::domain::{
    Ride, RideDraft, RideFilter, RideId, RideQuerySpec, RideSort, RideStatus, SortDirection,
    SortField, UserId,
};
use rideshare::outbound::persistence::{
    DbPool, DieselRideRepository, PoolConfig, run_pending_migrations,
};

const DATABASE_URL_VAR: &str = "RIDESHARE_TEST_DATABASE_URL";

async fn repository() -> Option<DieselRideRepository> {
    let url = std::env::var(DATABASE_URL_VAR).ok()?;
    run_pending_migrations(&url).await.expect("migrations apply");
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(2))
        .await
        .expect("pool builds");
    Some(DieselRideRepository::new(pool))
}

/// A ride whose pickup is unique to this test run.
fn ride(passenger: UserId, marker: &str, fare: f64) -> Ride {
    let draft = RideDraft::try_new(marker, "Depot", Some(3.0), Some(fare)).expect("draft");
    let created = Utc
        .with_ymd_and_hms(2024, 5, 20, 12, 0, 0)
        .single()
        .expect("timestamp");
    Ride::request(RideId::random(), passenger, draft, created)
}

#[tokio::test]
async fn stored_ride_round_trips_and_transitions_once() {
    let Some(repo) = repository().await else {
        return;
    };
    repo.ping().await.expect("ping");

    let passenger = UserId::random();
    let marker = format!("pickup-{}", RideId::random());
    let requested = ride(passenger, &marker, 90.0);
    repo.insert(&requested).await.expect("insert");
    assert_eq!(
        repo.find_by_id(&requested.id()).await.expect("find"),
        Some(requested.clone())
    );

    let driver = UserId::random();
    let accepted = requested.accept(driver).expect("accept");
    assert!(
        repo.compare_and_set(&accepted, RideStatus::Requested)
            .await
            .expect("first cas")
    );
    assert!(
        !repo
            .compare_and_set(&accepted, RideStatus::Requested)
            .await
            .expect("second cas")
    );

    let found = repo
        .find(&RideQuerySpec::all().with(RideFilter::Keyword(marker.to_uppercase())))
        .await
        .expect("keyword search");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].driver_id(), Some(driver));
}

#[tokio::test]
async fn location_sort_ignores_letter_case() {
    let Some(repo) = repository().await else {
        return;
    };
    let tag = RideId::random().to_string();
    for pickup in ["Zoo", "airport", "Museum"] {
        let stored = ride(UserId::random(), &format!("{pickup} {tag}"), 10.0);
        repo.insert(&stored).await.expect("insert");
    }

    let spec = RideQuerySpec::all()
        .with(RideFilter::Keyword(tag.clone()))
        .sorted_by(RideSort::new(SortField::PickupLocation, SortDirection::Ascending));
    let pickups: Vec<String> = repo
        .find(&spec)
        .await
        .expect("sorted search")
        .iter()
        .map(|r| r.pickup_location().to_owned())
        .collect();
    assert_eq!(
        pickups,
        vec![format!("airport {tag}"), format!("Museum {tag}"), format!("Zoo {tag}")]
    );
}

#[tokio::test]
async fn earnings_count_only_completed_rides() {
    let Some(repo) = repository().await else {
        return;
    };
    let driver = UserId::random();
    let marker = format!("earn-{}", RideId::random());

    let completed = ride(UserId::random(), &marker, 120.0)
        .accept(driver)
        .and_then(|r| r.complete())
        .expect("completed ride");
    let active = ride(UserId::random(), &marker, 75.0)
        .accept(driver)
        .expect("accepted ride");
    repo.insert(&completed).await.expect("insert completed");
    repo.insert(&active).await.expect("insert active");

    let summary = repo.driver_summary(&driver).await.expect("summary");
    assert_eq!(summary.completed_rides, 1);
    assert!((summary.total_earnings - 120.0).abs() < f64::EPSILON);
}
