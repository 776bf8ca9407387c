use thiserror::Error;

/// Failure surfaced by a unit of work or one of its repositories.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// A unique constraint rejected a write (at flush or commit time).
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A row refreshed after a write no longer exists.
    #[error("Row not found: {0}")]
    RowNotFound(String),

    /// A stored row could not be turned back into a domain entity.
    #[error("Invalid stored row: {0}")]
    InvalidRow(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl RepositoryError {
    pub fn is_unique_violation_of(&self, name: &str) -> bool {
        matches!(self, RepositoryError::UniqueViolation { constraint } if constraint == name)
    }
}
