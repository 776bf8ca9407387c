//! Mocks and scripted units of work shared by the service tests.

use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::TimeZone;
use chrono::Utc;
use mockall::mock;

use crate::domain::errors::RepositoryError;
use crate::domain::order::models::GeoPoint;
use crate::domain::order::models::NewOrder;
use crate::domain::order::models::Order;
use crate::domain::order::models::OrderFilter;
use crate::domain::order::models::OrderId;
use crate::domain::order::models::OrderName;
use crate::domain::order::ports::OrderRepository;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::ports::Staged;
use crate::domain::ports::UnitOfWork;
use crate::domain::ports::UnitOfWorkFactory;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::ProvisionOutcome;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserRole;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepository for UserRepo {
        async fn get_by_id(&mut self, id: UserId) -> Result<Option<User>, RepositoryError>;
        async fn get_by_email(&mut self, email: &EmailAddress) -> Result<Option<User>, RepositoryError>;
        async fn get_all_paginated(&mut self, request: PageRequest) -> Result<(Vec<User>, i64), RepositoryError>;
        async fn create(&mut self, user: NewUser, flush: bool) -> Result<Staged<User>, RepositoryError>;
    }
}

mock! {
    pub OrderRepo {}

    #[async_trait]
    impl OrderRepository for OrderRepo {
        async fn get_by_id(&mut self, id: OrderId) -> Result<Option<Order>, RepositoryError>;
        async fn get_all_paginated(&mut self, request: PageRequest) -> Result<(Vec<Order>, i64), RepositoryError>;
        async fn create(&mut self, order: NewOrder, flush: bool) -> Result<Staged<Order>, RepositoryError>;
        async fn search(&mut self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError>;
    }
}

mock! {
    pub UserService {}

    #[async_trait]
    impl UserServicePort for UserService {
        async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;
        async fn get_user(&self, id: &UserId) -> Result<User, UserError>;
        async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, UserError>;
        async fn list_users(&self, request: PageRequest) -> Result<Page<User>, UserError>;
        async fn provision_user(&self, command: CreateUserCommand) -> Result<ProvisionOutcome, UserError>;
    }
}

#[async_trait]
impl<'r> UserRepository for &'r mut MockUserRepo {
    async fn get_by_id(&mut self, id: UserId) -> Result<Option<User>, RepositoryError> {
        (**self).get_by_id(id).await
    }

    async fn get_by_email(
        &mut self,
        email: &EmailAddress,
    ) -> Result<Option<User>, RepositoryError> {
        (**self).get_by_email(email).await
    }

    async fn get_all_paginated(
        &mut self,
        request: PageRequest,
    ) -> Result<(Vec<User>, i64), RepositoryError> {
        (**self).get_all_paginated(request).await
    }

    async fn create(
        &mut self,
        user: NewUser,
        flush: bool,
    ) -> Result<Staged<User>, RepositoryError> {
        (**self).create(user, flush).await
    }
}

#[async_trait]
impl<'r> OrderRepository for &'r mut MockOrderRepo {
    async fn get_by_id(&mut self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        (**self).get_by_id(id).await
    }

    async fn get_all_paginated(
        &mut self,
        request: PageRequest,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        (**self).get_all_paginated(request).await
    }

    async fn create(
        &mut self,
        order: NewOrder,
        flush: bool,
    ) -> Result<Staged<Order>, RepositoryError> {
        (**self).create(order, flush).await
    }

    async fn search(&mut self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        (**self).search(filter).await
    }
}

/// Unit of work whose repositories are mocks. Commits are counted; one
/// scripted commit failure can be injected.
pub struct TestUnitOfWork {
    pub users: MockUserRepo,
    pub orders: MockOrderRepo,
    commit_error: Option<RepositoryError>,
    commits: Arc<AtomicUsize>,
}

impl TestUnitOfWork {
    pub fn new() -> Self {
        Self {
            users: MockUserRepo::new(),
            orders: MockOrderRepo::new(),
            commit_error: None,
            commits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_commit(mut self, error: RepositoryError) -> Self {
        self.commit_error = Some(error);
        self
    }

    /// Shared handle to the number of successful commits.
    pub fn commit_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.commits)
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    type Users<'a> = &'a mut MockUserRepo
    where
        Self: 'a;

    type Orders<'a> = &'a mut MockOrderRepo
    where
        Self: 'a;

    fn users(&mut self) -> Self::Users<'_> {
        &mut self.users
    }

    fn orders(&mut self) -> Self::Orders<'_> {
        &mut self.orders
    }

    async fn commit(&mut self) -> Result<(), RepositoryError> {
        if let Some(error) = self.commit_error.take() {
            return Err(error);
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Factory handing out pre-scripted units of work in order.
pub struct TestDatabase {
    units: Mutex<VecDeque<TestUnitOfWork>>,
    begun: AtomicUsize,
}

impl TestDatabase {
    pub fn with(units: Vec<TestUnitOfWork>) -> Self {
        Self {
            units: Mutex::new(units.into()),
            begun: AtomicUsize::new(0),
        }
    }

    pub fn begun(&self) -> usize {
        self.begun.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UnitOfWorkFactory for TestDatabase {
    type UnitOfWork = TestUnitOfWork;

    async fn begin(&self) -> Result<TestUnitOfWork, RepositoryError> {
        self.begun.fetch_add(1, Ordering::SeqCst);
        self.units
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| RepositoryError::Database("no scripted unit of work left".to_string()))
    }
}

pub fn user_fixture(id: i64, email: &str) -> User {
    User {
        id: UserId(id),
        email: EmailAddress::new(email.to_string()).unwrap(),
        first_name: PersonName::new("Bob".to_string()).unwrap(),
        last_name: PersonName::new("Feta".to_string()).unwrap(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        role: UserRole::Admin,
    }
}

pub fn order_fixture(id: i64, name: Option<&str>) -> Order {
    Order {
        id: OrderId(id),
        name: name.map(|name| OrderName::new(name.to_string()).unwrap()),
        description: None,
        start_point: GeoPoint::new(53.9, 27.56).unwrap(),
        end_point: GeoPoint::new(52.1, 23.7).unwrap(),
        distance_km: Some(348.0),
        duration_minutes: Some(240.0),
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}
