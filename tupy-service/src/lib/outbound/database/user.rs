use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgConnection;

use super::unit_of_work::PendingWrite;
use super::unit_of_work::PostgresUnitOfWork;
use crate::domain::errors::RepositoryError;
use crate::domain::pagination::PageRequest;
use crate::domain::ports::Staged;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

const COLUMNS: &str = "id, email, first_name, last_name, hashed_password, role";

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: String,
    first_name: String,
    last_name: String,
    hashed_password: String,
    role: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let invalid =
            |e: &dyn std::fmt::Display| RepositoryError::InvalidRow(format!("users.id = {id}: {e}"));

        Ok(User {
            id: UserId(id),
            email: EmailAddress::new(row.email).map_err(|e| invalid(&e))?,
            first_name: PersonName::new(row.first_name).map_err(|e| invalid(&e))?,
            last_name: PersonName::new(row.last_name).map_err(|e| invalid(&e))?,
            role: row.role.parse().map_err(|e| invalid(&e))?,
            password_hash: row.hashed_password,
        })
    }
}

/// Insert one user and read back the stored row.
pub(crate) async fn insert(
    connection: &mut PgConnection,
    user: &NewUser,
) -> Result<User, RepositoryError> {
    let query = format!(
        "INSERT INTO users (email, first_name, last_name, hashed_password, role) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
    );

    sqlx::query_as::<_, UserRow>(&query)
        .bind(user.email.as_str())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(connection)
        .await?
        .try_into()
}

/// User repository bound to one unit of work.
pub struct PostgresUserRepository<'u> {
    unit_of_work: &'u mut PostgresUnitOfWork,
}

impl<'u> PostgresUserRepository<'u> {
    pub fn new(unit_of_work: &'u mut PostgresUnitOfWork) -> Self {
        Self { unit_of_work }
    }
}

#[async_trait]
impl<'u> UserRepository for PostgresUserRepository<'u> {
    async fn get_by_id(&mut self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, UserRow>(&query)
            .bind(id.0)
            .fetch_optional(self.unit_of_work.session().await?)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn get_by_email(
        &mut self,
        email: &EmailAddress,
    ) -> Result<Option<User>, RepositoryError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");

        sqlx::query_as::<_, UserRow>(&query)
            .bind(email.as_str())
            .fetch_optional(self.unit_of_work.session().await?)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn get_all_paginated(
        &mut self,
        request: PageRequest,
    ) -> Result<(Vec<User>, i64), RepositoryError> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2");
        let connection = self.unit_of_work.session().await?;

        let users = sqlx::query_as::<_, UserRow>(&query)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&mut *connection)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *connection)
            .await?;

        Ok((users, total))
    }

    async fn create(
        &mut self,
        user: NewUser,
        flush: bool,
    ) -> Result<Staged<User>, RepositoryError> {
        if !flush {
            self.unit_of_work.stage(PendingWrite::User(user));
            return Ok(Staged::Pending);
        }

        let connection = self.unit_of_work.session().await?;
        let user = insert(connection, &user).await?;
        tracing::debug!(user_id = %user.id, "Inserted user");

        Ok(Staged::Flushed(user))
    }
}
