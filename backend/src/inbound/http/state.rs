//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised against in-memory adapters or mocks.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, RideAnalyticsQuery, RideCommand, RideSearchQuery};

/// Driving ports used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub rides: Arc<dyn RideCommand>,
    pub ride_search: Arc<dyn RideSearchQuery>,
    pub analytics: Arc<dyn RideAnalyticsQuery>,
}

impl HttpState {
    /// Bundle the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use rideshare::domain::{
    ///     AccountService, RideAnalyticsService, RideLifecycleService, RideSearchService,
    /// };
    /// use rideshare::inbound::http::state::HttpState;
    /// use rideshare::outbound::memory::{InMemoryRideRepository, InMemoryUserRepository};
    /// use rideshare::outbound::security::BcryptPasswordHasher;
    ///
    /// let users = Arc::new(InMemoryUserRepository::default());
    /// let rides = Arc::new(InMemoryRideRepository::default());
    /// let state = HttpState::new(
    ///     Arc::new(AccountService::new(
    ///         users.clone(),
    ///         Arc::new(BcryptPasswordHasher::default()),
    ///     )),
    ///     Arc::new(RideLifecycleService::new(
    ///         users,
    ///         rides.clone(),
    ///         Arc::new(DefaultClock),
    ///     )),
    ///     Arc::new(RideSearchService::new(rides.clone())),
    ///     Arc::new(RideAnalyticsService::new(rides)),
    /// );
    /// let _rides = state.rides.clone();
    /// ```
    pub fn new(
        accounts: Arc<dyn AccountCommand>,
        rides: Arc<dyn RideCommand>,
        ride_search: Arc<dyn RideSearchQuery>,
        analytics: Arc<dyn RideAnalyticsQuery>,
    ) -> Self {
        Self {
            accounts,
            rides,
            ride_search,
            analytics,
        }
    }
}
