//! Note repository contract and SQLite implementation.
//!
//! # Invariants
//! - A note owner, when present, must exist; violations surface as
//!   `RepoError::UnknownOwner`.
//! - Listings are ordered by `created_at DESC, id DESC`.
//! - Note ids are never rewritten; only `content` is mutable.

use crate::model::note::{NewNote, Note, NoteId};
use crate::model::user::UserId;
use crate::repo::{constraint_violation, ensure_tables, Constraint, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    content,
    created_at
FROM notes";

/// Ownership filter for note listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OwnerFilter {
    #[default]
    Any,
    User(UserId),
    /// Notes whose `user_id` is null.
    Unowned,
}

/// Query options for listing notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListQuery {
    pub owner: OwnerFilter,
    /// `None` returns every matching row.
    pub limit: Option<u32>,
    pub offset: u32,
}

impl NoteListQuery {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            owner: OwnerFilter::User(user_id),
            ..Self::default()
        }
    }
}

/// Repository interface for note persistence.
pub trait NoteRepository {
    /// Inserts one note and returns the stored row.
    fn create_note(&self, note: &NewNote) -> RepoResult<Note>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>>;
    fn count_notes(&self, owner: OwnerFilter) -> RepoResult<u64>;
    /// Replaces note content in full.
    fn update_note_content(&self, id: NoteId, content: &str) -> RepoResult<()>;
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    /// Deletes every note owned by `user_id`, returning how many were removed.
    fn delete_notes_for_user(&self, user_id: UserId) -> RepoResult<usize>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users", "notes"])?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &NewNote) -> RepoResult<Note> {
        let inserted = self.conn.query_row(
            "INSERT INTO notes (user_id, content, created_at)
             VALUES (?1, ?2, COALESCE(?3, strftime('%s', 'now') * 1000))
             RETURNING id, user_id, content, created_at;",
            params![note.user_id, note.content.as_str(), note.created_at],
            parse_note_row,
        );

        inserted.map_err(|err| match (constraint_violation(&err), note.user_id) {
            (Some(Constraint::ForeignKey), Some(owner)) => RepoError::UnknownOwner(owner),
            _ => err.into(),
        })
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let note = stmt.query_row([id], parse_note_row).optional()?;
        Ok(note)
    }

    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>> {
        let mut sql = format!("{NOTE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        push_owner_filter(&mut sql, &mut bind_values, query.owner);

        sql.push_str(" ORDER BY created_at DESC, id DESC");

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
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn count_notes(&self, owner: OwnerFilter) -> RepoResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM notes WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        push_owner_filter(&mut sql, &mut bind_values, owner);

        let count: i64 =
            self.conn
                .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative note count `{count}`")))
    }

    fn update_note_content(&self, id: NoteId, content: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes SET content = ?2 WHERE id = ?1;",
            params![id, content],
        )?;

        if changed == 0 {
            return Err(RepoError::NoteNotFound(id));
        }

        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NoteNotFound(id));
        }

        Ok(())
    }

    fn delete_notes_for_user(&self, user_id: UserId) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM notes WHERE user_id = ?1;", [user_id])?;
        Ok(removed)
    }
}

fn push_owner_filter(sql: &mut String, bind_values: &mut Vec<Value>, owner: OwnerFilter) {
    match owner {
        OwnerFilter::Any => {}
        OwnerFilter::User(user_id) => {
            sql.push_str(" AND user_id = ?");
            bind_values.push(Value::Integer(user_id));
        }
        OwnerFilter::Unowned => sql.push_str(" AND user_id IS NULL"),
    }
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
    })
}
