//! User service
//!
//! Registration and the admin bulk delete. Access tokens are minted by the
//! HTTP layer, not here.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::User;
use crate::error::{DomainError, DomainResult};
use crate::ports::{PasswordService, UserRepository};

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, name: &str, password: &str) -> DomainResult<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid("name must not be blank"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::invalid(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.users.find_by_name(name).await?.is_some() {
            return Err(DomainError::Duplicate(format!("name '{name}' is taken")));
        }

        let hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let user = self.users.insert(User::new(name.to_string(), hash)).await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    pub async fn get_by_id(&self, user_id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    /// Delete every user and, through the foreign keys, all their content.
    pub async fn purge_all(&self) -> DomainResult<u64> {
        let removed = self.users.delete_all().await?;
        warn!(removed, "All users purged");
        Ok(removed)
    }
}
