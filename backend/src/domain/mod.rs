//! Domain entities, services and ports.
//!
//! Purpose: hold the ride lifecycle, search and analytics rules independent of
//! HTTP and storage. Adapters talk to this module only through [`ports`].
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - [`User`], [`Role`]: accounts and the roles checked by the lifecycle.
//! - [`Ride`], [`RideStatus`]: the ride aggregate and its state machine.
//! - [`RideQuerySpec`]: store-agnostic search specification.
//! - Services implementing the driving ports.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod ports;
pub mod ride;
pub mod ride_analytics;
pub mod ride_analytics_service;
pub mod ride_lifecycle_service;
pub mod ride_query;
pub mod ride_search_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{CredentialsValidationError, LoginCredentials, Registration};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ride::{
    Ride, RideDraft, RideId, RideRecord, RideStatus, RideTransitionError, RideValidationError,
};
pub use self::ride_analytics::{
    DailyRideCount, DriverSummary, StatusCount, UserSpending, completed_earnings,
};
pub use self::ride_analytics_service::RideAnalyticsService;
pub use self::ride_lifecycle_service::RideLifecycleService;
pub use self::ride_query::{
    DEFAULT_PAGE_SIZE, DayRange, MAX_PAGE_SIZE, PageRequest, RideFilter, RideQueryError,
    RideQuerySpec, RideSort, SortDirection, SortField,
};
pub use self::ride_search_service::RideSearchService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Role, User, UserId, UserValidationError, Username};
