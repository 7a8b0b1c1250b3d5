use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::error::DomainError;
use super::model::{Credentials, NewUser, User};
use super::password::PasswordHasher;
use super::repo::UsersRepository;

const MAX_FIELD_LENGTH: usize = 255;

pub struct AccountService {
    repo: Arc<dyn UsersRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    pub fn new(repo: Arc<dyn UsersRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repo, hasher }
    }

    /// Register a new user. Username and email must both be unclaimed.
    #[instrument(skip(self, new), fields(username = %new.username))]
    pub async fn register(&self, new: NewUser) -> Result<User, DomainError> {
        validate_field("username", &new.username)?;
        validate_field("email", &new.email)?;
        validate_field("password", &new.password)?;
        if !new.email.contains('@') {
            return Err(DomainError::validation("email", "not a valid email address"));
        }

        if self
            .repo
            .find_by_username_or_email(&new.username, &new.email)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyRegistered);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password_hash: self.hasher.hash(&new.password)?,
            created_at: Utc::now(),
        };
        self.repo.insert(&user).await?;

        debug!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Check credentials. Unknown usernames and wrong passwords are
    /// indistinguishable to the caller.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn authenticate(&self, credentials: Credentials) -> Result<User, DomainError> {
        let user = self
            .repo
            .find_by_username(&credentials.username)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !self
            .hasher
            .verify(&credentials.password, &user.password_hash)
        {
            return Err(DomainError::InvalidCredentials);
        }

        debug!(user_id = %user.id, "login succeeded");
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<User, DomainError> {
        self.repo.find_by_id(id).await?.ok_or(DomainError::NotFound)
    }
}

fn validate_field(field: &str, value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    if value.len() > MAX_FIELD_LENGTH {
        return Err(DomainError::validation(
            field,
            format!("exceeds maximum length of {MAX_FIELD_LENGTH}"),
        ));
    }
    Ok(())
}
