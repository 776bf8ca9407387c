use async_trait::async_trait;

use crate::domain::errors::RepositoryError;
use crate::domain::order::ports::OrderRepository;
use crate::domain::user::ports::UserRepository;

/// Outcome of staging a new row through a repository.
#[derive(Debug, Clone, PartialEq)]
pub enum Staged<T> {
    /// Written immediately; server-assigned fields (id, defaults) are populated.
    Flushed(T),
    /// Queued in the unit of work; written when it flushes or commits.
    Pending,
}

impl<T> Staged<T> {
    pub fn flushed(self) -> Option<T> {
        match self {
            Staged::Flushed(entity) => Some(entity),
            Staged::Pending => None,
        }
    }
}

/// Hands out one unit of work per logical operation.
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync + 'static {
    type UnitOfWork: UnitOfWork + 'static;

    /// Acquire a session from the pool and open a unit of work on it.
    ///
    /// # Errors
    /// * `Database` - No connection could be acquired
    async fn begin(&self) -> Result<Self::UnitOfWork, RepositoryError>;
}

/// One database session owned by a single logical operation.
///
/// Repositories handed out by [`users`](UnitOfWork::users) and
/// [`orders`](UnitOfWork::orders) run against the same session, in the order
/// they are called. Dropping the unit of work without committing discards
/// pending writes and releases the connection.
#[async_trait]
pub trait UnitOfWork: Send {
    type Users<'a>: UserRepository + 'a
    where
        Self: 'a;

    type Orders<'a>: OrderRepository + 'a
    where
        Self: 'a;

    fn users(&mut self) -> Self::Users<'_>;

    fn orders(&mut self) -> Self::Orders<'_>;

    /// Flush pending writes and commit the open transaction.
    ///
    /// # Errors
    /// * `UniqueViolation` - A staged row collides with an existing one
    /// * `Database` - Any other failure while writing or committing
    async fn commit(&mut self) -> Result<(), RepositoryError>;

    /// Discard pending writes and roll the open transaction back.
    async fn rollback(&mut self) -> Result<(), RepositoryError>;

    /// Reload server-assigned fields of an entity written earlier.
    ///
    /// # Errors
    /// * `RowNotFound` - The row is gone
    async fn refresh<E>(&mut self, entity: &mut E) -> Result<(), RepositoryError>
    where
        E: Refreshable,
        Self: Sized,
    {
        match E::reload(self, entity).await? {
            Some(reloaded) => {
                *entity = reloaded;
                Ok(())
            }
            None => Err(RepositoryError::RowNotFound(entity.describe())),
        }
    }
}

/// Entities whose stored state can be read back through a unit of work.
#[async_trait]
pub trait Refreshable: Sized + Send + Sync {
    fn describe(&self) -> String;

    async fn reload<U>(unit_of_work: &mut U, current: &Self) -> Result<Option<Self>, RepositoryError>
    where
        U: UnitOfWork;
}
