use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::RepositoryError;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::ports::Staged;
use crate::domain::ports::UnitOfWork;
use crate::domain::ports::UnitOfWorkFactory;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;
use crate::domain::user::models::ProvisionOutcome;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

/// Name of the unique constraint guarding `users.email`.
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// Domain service implementation for user operations.
///
/// Every operation opens its own unit of work from the injected factory.
pub struct UserService<F>
where
    F: UnitOfWorkFactory,
{
    database: Arc<F>,
    password_hasher: auth::PasswordHasher,
}

impl<F> UserService<F>
where
    F: UnitOfWorkFactory,
{
    pub fn new(database: Arc<F>) -> Self {
        Self {
            database,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    /// Hash on a blocking worker so concurrent requests keep flowing.
    async fn hash_password(&self, password: Password) -> Result<String, UserError> {
        let hasher = self.password_hasher;

        tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|e| UserError::PasswordHashing(e.to_string()))?
            .map_err(|e| UserError::PasswordHashing(e.to_string()))
    }

    async fn new_user(&self, command: CreateUserCommand) -> Result<NewUser, UserError> {
        let password_hash = self.hash_password(command.password).await?;

        Ok(NewUser {
            email: command.email,
            first_name: command.first_name,
            last_name: command.last_name,
            password_hash,
            role: command.role,
        })
    }
}

fn write_error(error: RepositoryError, email: &EmailAddress) -> UserError {
    if error.is_unique_violation_of(EMAIL_UNIQUE_CONSTRAINT) {
        UserError::EmailAlreadyExists(email.to_string())
    } else {
        UserError::Repository(error)
    }
}

#[async_trait]
impl<F> UserServicePort for UserService<F>
where
    F: UnitOfWorkFactory,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let mut unit_of_work = self.database.begin().await?;

        // Check-then-insert is not atomic; a concurrent writer surfaces as a
        // unique violation below and maps to the same conflict.
        if unit_of_work
            .users()
            .get_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let email = command.email.clone();
        let new_user = self.new_user(command).await?;

        let mut user = unit_of_work
            .users()
            .create(new_user, true)
            .await
            .map_err(|e| write_error(e, &email))?
            .flushed()
            .ok_or_else(|| RepositoryError::RowNotFound(format!("user {}", email)))?;

        unit_of_work
            .commit()
            .await
            .map_err(|e| write_error(e, &email))?;
        unit_of_work.refresh(&mut user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created");

        Ok(user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        let mut unit_of_work = self.database.begin().await?;

        let user = unit_of_work.users().get_by_id(*id).await?;

        user.ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, UserError> {
        let mut unit_of_work = self.database.begin().await?;

        let user = unit_of_work.users().get_by_email(email).await?;

        user.ok_or(UserError::NotFoundByEmail(email.to_string()))
    }

    async fn list_users(&self, request: PageRequest) -> Result<Page<User>, UserError> {
        let mut unit_of_work = self.database.begin().await?;

        let (users, total) = unit_of_work.users().get_all_paginated(request).await?;

        Ok(Page::new(users, total, request))
    }

    async fn provision_user(
        &self,
        command: CreateUserCommand,
    ) -> Result<ProvisionOutcome, UserError> {
        let mut unit_of_work = self.database.begin().await?;

        if unit_of_work
            .users()
            .get_by_email(&command.email)
            .await?
            .is_some()
        {
            tracing::info!(email = %command.email, "User already exists, nothing to provision");
            return Ok(ProvisionOutcome::AlreadyExists);
        }

        let email = command.email.clone();
        let new_user = self.new_user(command).await?;

        match unit_of_work.users().create(new_user, false).await? {
            Staged::Pending => tracing::debug!(email = %email, "User staged until commit"),
            Staged::Flushed(user) => tracing::debug!(user_id = %user.id, "User flushed early"),
        }

        unit_of_work
            .commit()
            .await
            .map_err(|e| write_error(e, &email))?;

        tracing::info!(email = %email, "User provisioned");

        Ok(ProvisionOutcome::Created)
    }
}
