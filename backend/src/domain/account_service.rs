//! Account registration and credential checks.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::ports::{
    AccountCommand, PasswordHash, PasswordHasher, PasswordHasherError, UserPersistenceError,
    UserRepository,
};
use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

const INVALID_CREDENTIALS: &str = "invalid username or password";
/// Hashed once, then verified against when the username is unknown.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-users";

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => {
            Error::conflict(format!("username '{username}' is already taken"))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

/// Account service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    decoy: Arc<OnceCell<PasswordHash>>,
}

impl<U, H> AccountService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self {
            users,
            hasher,
            decoy: Arc::new(OnceCell::new()),
        }
    }
}

impl<U, H: PasswordHasher> AccountService<U, H> {
    /// Burn one verification for a login whose username does not exist.
    async fn verify_decoy(&self, password: &str) -> Result<(), Error> {
        let decoy = self
            .decoy
            .get_or_try_init(|| self.hasher.hash(DECOY_PASSWORD))
            .await
            .map_err(map_hasher_error)?;
        self.hasher
            .verify(password, decoy)
            .await
            .map_err(map_hasher_error)?;
        Ok(())
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hasher_error)?;
        let user = User::new(
            UserId::random(),
            registration.username().clone(),
            registration.role(),
        );
        self.users
            .insert(&user, &hash)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), role = %user.role(), "registered account");
        Ok(user)
    }

    async fn authenticate(&self, credentials: LoginCredentials) -> Result<User, Error> {
        let Some(stored) = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(map_user_error)?
        else {
            debug!("login for unknown username");
            self.verify_decoy(credentials.password()).await?;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !matches {
            debug!(user_id = %stored.user.id(), "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(stored.user)
    }

    async fn current_user(&self, user_id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}
