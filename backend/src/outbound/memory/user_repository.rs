//! Mutex-guarded account store.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{PasswordHash, StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: Mutex<Vec<StoredCredentials>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn accounts(&self) -> Result<MutexGuard<'_, Vec<StoredCredentials>>, UserPersistenceError> {
        self.accounts
            .lock()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut accounts = self.accounts()?;
        if accounts
            .iter()
            .any(|stored| stored.user.username() == user.username())
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        accounts.push(StoredCredentials {
            user: user.clone(),
            password_hash: password_hash.clone(),
        });
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .accounts()?
            .iter()
            .find(|stored| stored.user.id() == *id)
            .map(|stored| stored.user.clone()))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self
            .accounts()?
            .iter()
            .find(|stored| stored.user.username().as_ref() == username)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, Username};

    fn user(name: &str) -> User {
        User::new(UserId::random(), Username::new(name).expect("name"), Role::Passenger)
    }

    #[tokio::test]
    async fn rejects_duplicate_usernames() {
        let repo = InMemoryUserRepository::new();
        let hash = PasswordHash::new("h");
        repo.insert(&user("ada"), &hash).await.expect("first insert");
        let err = repo
            .insert(&user("ada"), &hash)
            .await
            .expect_err("duplicate");
        assert_eq!(err, UserPersistenceError::duplicate_username("ada"));
    }

    #[tokio::test]
    async fn finds_by_id_and_username() {
        let repo = InMemoryUserRepository::new();
        let ada = user("ada");
        repo.insert(&ada, &PasswordHash::new("h"))
            .await
            .expect("insert");
        assert_eq!(repo.find_by_id(&ada.id()).await.expect("read"), Some(ada.clone()));
        let creds = repo
            .find_credentials("ada")
            .await
            .expect("read")
            .expect("present");
        assert_eq!(creds.user, ada);
        assert!(repo.find_credentials("bob").await.expect("read").is_none());
    }
}
