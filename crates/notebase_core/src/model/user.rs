//! User identity record.
//!
//! # Invariants
//! - `username` is 1..=50 characters and `email` is 1..=100 characters.
//! - `password_hash` holds an opaque credential digest, never a plaintext
//!   secret, and is never serialized.
//! - `id` is immutable once assigned.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned surrogate key of a user row.
pub type UserId = i64;

/// Column limit for `users.username`, in characters.
pub const USERNAME_MAX_CHARS: usize = 50;
/// Column limit for `users.email`, in characters.
pub const EMAIL_MAX_CHARS: usize = 100;

/// Persisted user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Insert payload for a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// Falls back to the store clock when `None`.
    pub created_at: Option<i64>,
}

/// Column-level validation failure for user writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    BlankUsername,
    UsernameTooLong { chars: usize, max: usize },
    BlankEmail,
    EmailTooLong { chars: usize, max: usize },
    BlankPasswordHash,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankUsername => write!(f, "username is required"),
            Self::UsernameTooLong { chars, max } => {
                write!(f, "username has {chars} characters; limit is {max}")
            }
            Self::BlankEmail => write!(f, "email is required"),
            Self::EmailTooLong { chars, max } => {
                write!(f, "email has {chars} characters; limit is {max}")
            }
            Self::BlankPasswordHash => write!(f, "password hash is required"),
        }
    }
}

impl Error for UserValidationError {}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: None,
        }
    }

    /// Pins `created_at` instead of using the store default.
    ///
    /// Used by import paths that already carry a creation time.
    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Checks required columns and character limits.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.username.trim().is_empty() {
            return Err(UserValidationError::BlankUsername);
        }
        let chars = self.username.chars().count();
        if chars > USERNAME_MAX_CHARS {
            return Err(UserValidationError::UsernameTooLong {
                chars,
                max: USERNAME_MAX_CHARS,
            });
        }

        if self.email.trim().is_empty() {
            return Err(UserValidationError::BlankEmail);
        }
        let chars = self.email.chars().count();
        if chars > EMAIL_MAX_CHARS {
            return Err(UserValidationError::EmailTooLong {
                chars,
                max: EMAIL_MAX_CHARS,
            });
        }

        if self.password_hash.trim().is_empty() {
            return Err(UserValidationError::BlankPasswordHash);
        }

        Ok(())
    }
}
