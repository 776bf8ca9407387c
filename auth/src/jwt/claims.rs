use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Numeric user identifier
    pub user_id: i64,

    pub email: String,

    pub first_name: String,

    pub last_name: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Build claims for a user that expire `ttl_minutes` from now.
    ///
    /// A lifetime beyond what a timestamp can hold saturates at the
    /// representable bound instead of overflowing.
    pub fn for_user(
        user_id: i64,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        ttl_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        let expiration = Duration::try_minutes(ttl_minutes)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(if ttl_minutes < 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            });

        Self {
            user_id,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            exp: expiration.timestamp(),
            iat: Some(now.timestamp()),
        }
    }

    /// Override the expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// A token stops being valid at the exact second it expires.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
