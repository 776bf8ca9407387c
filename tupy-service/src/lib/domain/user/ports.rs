use async_trait::async_trait;

use crate::domain::errors::RepositoryError;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::ports::Staged;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::ProvisionOutcome;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Create new user with validated credentials.
    ///
    /// Runs in its own unit of work: checks the email, hashes the password
    /// off the async runtime, writes the row, commits and refreshes it.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `PasswordHashing` - Hashing failed
    /// * `Repository` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Repository` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Retrieve user by email.
    ///
    /// # Errors
    /// * `NotFoundByEmail` - No user with this email
    /// * `Repository` - Database operation failed
    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, UserError>;

    /// One page of users ordered by id, with the total count.
    ///
    /// # Errors
    /// * `Repository` - Database operation failed
    async fn list_users(&self, request: PageRequest) -> Result<Page<User>, UserError>;

    /// Create the user unless one with the same email exists.
    ///
    /// The row is staged without an immediate flush and written on commit.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Another writer won the race at commit time
    /// * `Repository` - Database operation failed
    async fn provision_user(&self, command: CreateUserCommand)
        -> Result<ProvisionOutcome, UserError>;
}

/// Query and write operations for users, bound to one unit of work.
#[async_trait]
pub trait UserRepository: Send {
    async fn get_by_id(&mut self, id: UserId) -> Result<Option<User>, RepositoryError>;

    async fn get_by_email(&mut self, email: &EmailAddress)
        -> Result<Option<User>, RepositoryError>;

    /// Page of users ordered by id, plus a separate full count.
    ///
    /// The two queries are not snapshot isolated from concurrent writers.
    async fn get_all_paginated(
        &mut self,
        request: PageRequest,
    ) -> Result<(Vec<User>, i64), RepositoryError>;

    /// Stage a new user.
    ///
    /// With `flush` the row is written at once and returned with its id;
    /// otherwise it waits for the unit of work to flush or commit.
    ///
    /// # Errors
    /// * `UniqueViolation` - Email taken (only reported here when flushing)
    async fn create(&mut self, user: NewUser, flush: bool)
        -> Result<Staged<User>, RepositoryError>;
}
