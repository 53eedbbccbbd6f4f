//! Driving port for sign-up, login and identity resolution.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account. A taken username yields `ErrorCode::Conflict`.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Check credentials. Unknown users and wrong passwords both yield the
    /// same `ErrorCode::Unauthorized` error.
    async fn authenticate(&self, credentials: LoginCredentials) -> Result<User, Error>;

    /// Resolve a session identity to its account.
    async fn current_user(&self, user_id: UserId) -> Result<User, Error>;
}
