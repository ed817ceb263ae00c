//! Repository contracts and SQLite implementations for users and notes.
//!
//! # Responsibility
//! - Keep SQL inside the persistence boundary.
//! - Translate SQLite constraint failures into semantic `RepoError`s.
//!
//! # Invariants
//! - User writes run `NewUser::validate()` before SQL.
//! - Reads reject malformed persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::note::NoteId;
use crate::model::user::{UserId, UserValidationError};
use rusqlite::{ffi, Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod note_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

const FOREIGN_KEY_FAILED: &str = "FOREIGN KEY constraint failed";

/// Unique column that rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl UniqueField {
    pub fn column(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

/// Repository error for user/note persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(UserValidationError),
    Db(DbError),
    UserNotFound(UserId),
    NoteNotFound(NoteId),
    /// A unique column already holds the written value.
    Conflict(UniqueField),
    /// `notes.user_id` points at a user that does not exist.
    UnknownOwner(UserId),
    /// The user still owns notes and the delete is restricted.
    OwnerHasNotes(UserId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Conflict(field) => write!(f, "{} already exists", field.column()),
            Self::UnknownOwner(id) => write!(f, "note owner does not exist: {id}"),
            Self::OwnerHasNotes(id) => write!(f, "user {id} still owns notes"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Constraint class reported by a failed SQLite write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Constraint {
    /// Qualified column, e.g. `users.email`.
    Unique(String),
    ForeignKey,
    Other,
}

/// Classifies a rusqlite error as a constraint violation, if it is one.
pub(crate) fn constraint_violation(err: &rusqlite::Error) -> Option<Constraint> {
    let rusqlite::Error::SqliteFailure(failure, message) = err else {
        return None;
    };
    if failure.code != ErrorCode::ConstraintViolation {
        return None;
    }

    let constraint = match failure.extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE => {
            let column = message
                .as_deref()
                .and_then(|text| text.rsplit_once(": "))
                .map(|(_, column)| column.trim().to_string())
                .unwrap_or_default();
            Constraint::Unique(column)
        }
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Constraint::ForeignKey,
        // `ON DELETE RESTRICT` raises through the trigger machinery.
        _ if message.as_deref() == Some(FOREIGN_KEY_FAILED) => Constraint::ForeignKey,
        _ => Constraint::Other,
    };
    Some(constraint)
}

pub(crate) fn unique_field(column: &str) -> Option<UniqueField> {
    match column {
        "users.username" => Some(UniqueField::Username),
        "users.email" => Some(UniqueField::Email),
        _ => None,
    }
}

pub(crate) fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    for &table in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::{constraint_violation, unique_field, Constraint, UniqueField};
    use rusqlite::Connection;

    #[test]
    fn unique_violation_reports_qualified_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE users (username TEXT UNIQUE);
             INSERT INTO users (username) VALUES ('ada');",
        )
        .unwrap();

        let err = conn
            .execute("INSERT INTO users (username) VALUES ('ada');", [])
            .unwrap_err();
        assert_eq!(
            constraint_violation(&err),
            Some(Constraint::Unique("users.username".to_string()))
        );
    }

    #[test]
    fn restricted_delete_is_classified_as_foreign_key() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE users (id INTEGER PRIMARY KEY);
             CREATE TABLE notes (
                 id INTEGER PRIMARY KEY,
                 user_id INTEGER REFERENCES users(id) ON DELETE RESTRICT
             );
             INSERT INTO users (id) VALUES (1);
             INSERT INTO notes (user_id) VALUES (1);",
        )
        .unwrap();

        let err = conn
            .execute("DELETE FROM users WHERE id = 1;", [])
            .unwrap_err();
        assert_eq!(constraint_violation(&err), Some(Constraint::ForeignKey));
    }

    #[test]
    fn dangling_insert_is_classified_as_foreign_key() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE users (id INTEGER PRIMARY KEY);
             CREATE TABLE notes (user_id INTEGER REFERENCES users(id) ON DELETE RESTRICT);",
        )
        .unwrap();

        let err = conn
            .execute("INSERT INTO notes (user_id) VALUES (7);", [])
            .unwrap_err();
        assert_eq!(constraint_violation(&err), Some(Constraint::ForeignKey));
    }

    #[test]
    fn non_constraint_errors_are_not_classified() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn.execute("SELECT * FROM missing;", []).unwrap_err();
        assert_eq!(constraint_violation(&err), None);
    }

    #[test]
    fn unique_field_maps_known_columns_only() {
        assert_eq!(unique_field("users.email"), Some(UniqueField::Email));
        assert_eq!(unique_field("users.username"), Some(UniqueField::Username));
        assert_eq!(unique_field("notes.content"), None);
    }
}
