//! Embedded users/notes store.
//!
//! Owns the SQLite schema for `users` and `notes`, enforces its uniqueness,
//! not-null, length and referential constraints, and exposes typed
//! repositories and use-case services on top of it.

pub mod config;
pub mod credential;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use credential::{digest_scheme, hash_password, verify_password, CredentialError, DigestScheme};
pub use db::{open_db, open_db_existing, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{NewNote, Note, NoteId};
pub use model::user::{NewUser, User, UserId, UserValidationError};
pub use repo::note_repo::{NoteListQuery, NoteRepository, OwnerFilter, SqliteNoteRepository};
pub use repo::user_repo::{SqliteUserRepository, UserListQuery, UserRepository};
pub use repo::{RepoError, RepoResult, UniqueField};
pub use service::account_service::{AccountService, AccountServiceError, RegisterRequest};
pub use service::note_service::{NoteService, NoteServiceError};

/// Minimal health check.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
