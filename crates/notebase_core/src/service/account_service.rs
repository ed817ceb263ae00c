//! Account use-case service.
//!
//! # Responsibility
//! - Register users from raw sign-up input (trim, validate, hash).
//! - Remove an account together with every note it owns.
//!
//! # Invariants
//! - Plaintext passwords are hashed before they reach the repository.
//! - Uniqueness conflicts are reported per column.

use crate::credential::{hash_password, CredentialError};
use crate::model::user::{NewUser, User, UserId};
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, UniqueField};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN_CHARS: usize = 6;

static EMAIL_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email regex"));

/// Raw sign-up input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Service error for account use-cases.
#[derive(Debug)]
pub enum AccountServiceError {
    /// A required input field is blank.
    MissingField(&'static str),
    PasswordTooShort { min: usize },
    InvalidEmail(String),
    UsernameTaken(String),
    EmailTaken(String),
    UserNotFound(UserId),
    Credential(CredentialError),
    Repo(RepoError),
}

impl Display for AccountServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters long")
            }
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
            Self::UsernameTaken(value) => write!(f, "username already exists: `{value}`"),
            Self::EmailTaken(value) => write!(f, "email already registered: `{value}`"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::Credential(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Credential(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CredentialError> for AccountServiceError {
    fn from(value: CredentialError) -> Self {
        Self::Credential(value)
    }
}

impl From<RepoError> for AccountServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::UserNotFound(id) => Self::UserNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Account service facade over a user repository.
pub struct AccountService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a user from sign-up input.
    ///
    /// # Errors
    /// - `MissingField` when any field is blank.
    /// - `PasswordTooShort` below `PASSWORD_MIN_CHARS`.
    /// - `InvalidEmail` when the address is not `local@domain`.
    /// - `UsernameTaken` / `EmailTaken` on uniqueness conflicts.
    pub fn register(&self, request: RegisterRequest) -> Result<User, AccountServiceError> {
        let username = request.username.trim();
        let email = request.email.trim();

        if username.is_empty() {
            return Err(AccountServiceError::MissingField("username"));
        }
        if email.is_empty() {
            return Err(AccountServiceError::MissingField("email"));
        }
        if request.password.is_empty() {
            return Err(AccountServiceError::MissingField("password"));
        }
        if request.password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(AccountServiceError::PasswordTooShort {
                min: PASSWORD_MIN_CHARS,
            });
        }
        if !EMAIL_SHAPE_RE.is_match(email) {
            return Err(AccountServiceError::InvalidEmail(email.to_string()));
        }

        let digest = hash_password(&request.password)?;
        let new_user = NewUser::new(username, email, digest);
        let user = self.repo.create_user(&new_user).map_err(|err| match err {
            RepoError::Conflict(UniqueField::Username) => {
                AccountServiceError::UsernameTaken(username.to_string())
            }
            RepoError::Conflict(UniqueField::Email) => {
                AccountServiceError::EmailTaken(email.to_string())
            }
            other => other.into(),
        })?;

        info!(
            "event=account_register module=service status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> Result<User, AccountServiceError> {
        self.repo
            .get_user(id)?
            .ok_or(AccountServiceError::UserNotFound(id))
    }

    /// Deletes the account and all of its notes in one transaction.
    ///
    /// Returns how many notes were removed.
    pub fn delete_account(&mut self, id: UserId) -> Result<usize, AccountServiceError> {
        let removed_notes = self.repo.delete_user_with_notes(id)?;
        info!(
            "event=account_delete module=service status=ok user_id={} removed_notes={}",
            id, removed_notes
        );
        Ok(removed_notes)
    }
}
