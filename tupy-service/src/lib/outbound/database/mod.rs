pub mod order;
pub mod unit_of_work;
pub mod user;

pub use unit_of_work::PostgresDatabase;
pub use unit_of_work::PostgresUnitOfWork;

use crate::domain::errors::RepositoryError;

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return RepositoryError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                };
            }
        }
        RepositoryError::Database(e.to_string())
    }
}
