//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert and query `users` rows.
//! - Own the user deletion policy.
//!
//! # Invariants
//! - `username` and `email` uniqueness is enforced by storage and reported as
//!   `RepoError::Conflict`.
//! - `delete_user` is restricted while notes reference the user.
//! - `delete_user_with_notes` removes notes and user in one transaction.

use crate::model::user::{NewUser, User, UserId};
use crate::repo::{
    constraint_violation, ensure_tables, unique_field, Constraint, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};

const USER_SELECT_SQL: &str = "SELECT
    id,
    username,
    email,
    password_hash,
    created_at
FROM users";

/// Paging options for listing users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for user persistence.
pub trait UserRepository {
    /// Inserts one user and returns the stored row.
    fn create_user(&self, user: &NewUser) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Lists users in ascending id order.
    fn list_users(&self, query: &UserListQuery) -> RepoResult<Vec<User>>;
    fn count_users(&self) -> RepoResult<u64>;
    /// Deletes one user. Fails with `OwnerHasNotes` while notes reference it.
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
    /// Deletes the user's notes, then the user, atomically.
    ///
    /// Returns the number of notes removed.
    fn delete_user_with_notes(&mut self, id: UserId) -> RepoResult<usize>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users", "notes"])?;
        Ok(Self { conn })
    }

    fn query_one(&self, predicate: &str, value: Value) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE {predicate};"))?;
        let user = stmt.query_row([value], parse_user_row).optional()?;
        Ok(user)
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        user.validate()?;

        let inserted = self.conn.query_row(
            "INSERT INTO users (username, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, COALESCE(?4, strftime('%s', 'now') * 1000))
             RETURNING id, username, email, password_hash, created_at;",
            params![
                user.username.as_str(),
                user.email.as_str(),
                user.password_hash.as_str(),
                user.created_at,
            ],
            parse_user_row,
        );

        inserted.map_err(|err| match constraint_violation(&err) {
            Some(Constraint::Unique(column)) => match unique_field(&column) {
                Some(field) => RepoError::Conflict(field),
                None => err.into(),
            },
            _ => err.into(),
        })
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.query_one("id = ?1", Value::Integer(id))
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.query_one("username = ?1", Value::Text(username.to_string()))
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.query_one("email = ?1", Value::Text(email.to_string()))
    }

    fn list_users(&self, query: &UserListQuery) -> RepoResult<Vec<User>> {
        let mut sql = format!("{USER_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();

        match query.limit {
            Some(limit) => {
                sql.push_str(" LIMIT ?");
                bind_values.push(Value::Integer(i64::from(limit)));
            }
            None if query.offset > 0 => sql.push_str(" LIMIT -1"),
            None => {}
        }
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        Ok(users)
    }

    fn count_users(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative user count `{count}`")))
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [id])
            .map_err(|err| match constraint_violation(&err) {
                Some(Constraint::ForeignKey) => RepoError::OwnerHasNotes(id),
                _ => err.into(),
            })?;

        if changed == 0 {
            return Err(RepoError::UserNotFound(id));
        }

        Ok(())
    }

    fn delete_user_with_notes(&mut self, id: UserId) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::UserNotFound(id));
        }

        let removed_notes = tx.execute("DELETE FROM notes WHERE user_id = ?1;", [id])?;
        tx.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        tx.commit()?;

        Ok(removed_notes)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
    })
}
