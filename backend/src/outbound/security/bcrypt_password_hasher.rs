//! bcrypt implementation of [`PasswordHasher`].
//!
//! Hashing is CPU bound, so both operations run on the blocking pool.

use async_trait::async_trait;
use tokio::task;

use crate::domain::ports::{PasswordHash, PasswordHasher, PasswordHasherError};

/// bcrypt hasher with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher using `cost` rounds (bcrypt accepts 4 to 31).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

fn backend_error(error: impl std::fmt::Display) -> PasswordHasherError {
    PasswordHasherError::backend(error.to_string())
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let cost = self.cost;
        let password = zeroize::Zeroizing::new(password.to_owned());
        task::spawn_blocking(move || bcrypt::hash(password.as_str(), cost))
            .await
            .map_err(backend_error)?
            .map(PasswordHash::new)
            .map_err(backend_error)
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let password = zeroize::Zeroizing::new(password.to_owned());
        let encoded = hash.as_str().to_owned();
        match task::spawn_blocking(move || bcrypt::verify(password.as_str(), &encoded))
            .await
            .map_err(backend_error)?
        {
            Ok(matches) => Ok(matches),
            // A malformed stored hash can never match.
            Err(bcrypt::BcryptError::InvalidHash(_) | bcrypt::BcryptError::InvalidPrefix(_)) => {
                Ok(false)
            }
            Err(error) => Err(backend_error(error)),
        }
    }
}
