use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::errors::RepositoryError;
use crate::domain::ports::Refreshable;
use crate::domain::ports::UnitOfWork;
use crate::domain::user::errors::EmailError;
use crate::domain::user::errors::PasswordPolicyError;
use crate::domain::user::errors::PersonNameError;
use crate::domain::user::errors::UserRoleError;
use crate::domain::user::ports::UserRepository;

/// Registered user.
///
/// `password_hash` never leaves the service; response types copy the other
/// fields explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password_hash: String,
    pub role: UserRole,
}

#[async_trait]
impl Refreshable for User {
    fn describe(&self) -> String {
        format!("user {}", self.id)
    }

    async fn reload<U>(unit_of_work: &mut U, current: &Self) -> Result<Option<Self>, RepositoryError>
    where
        U: UnitOfWork,
    {
        unit_of_work.users().get_by_id(current.id).await
    }
}

/// Database-assigned user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser, capped at the
/// column width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 100;

    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    /// * `TooLong` - More than 100 characters
    pub fn new(email: String) -> Result<Self, EmailError> {
        let length = email.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// First or last name, 1-50 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    const MIN_LENGTH: usize = 1;
    const MAX_LENGTH: usize = 50;

    pub fn new(name: String) -> Result<Self, PersonNameError> {
        let length = name.chars().count();
        if length < Self::MIN_LENGTH {
            Err(PersonNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(PersonNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plaintext password that satisfies the 6-50 character policy.
///
/// Only ever held long enough to hash or verify it.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;
    const MAX_LENGTH: usize = 50;

    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(password))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    Admin,
    Dispatcher,
    Courier,
    Client,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Admin,
        UserRole::Dispatcher,
        UserRole::Courier,
        UserRole::Client,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Dispatcher => "DISPATCHER",
            UserRole::Courier => "COURIER",
            UserRole::Client => "CLIENT",
        }
    }
}

impl FromStr for UserRole {
    type Err = UserRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UserRoleError(s.to_string()))
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row to insert; the id is assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: EmailAddress,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password_hash: String,
    pub role: UserRole,
}

/// Command to create a new user with domain types
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub email: EmailAddress,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password: Password,
    pub role: UserRole,
}

/// What [`provision_user`](super::ports::UserServicePort::provision_user) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created,
    AlreadyExists,
}
