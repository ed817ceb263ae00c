//! Note content record.
//!
//! A note optionally belongs to one user; ownership is enforced by the
//! `notes.user_id -> users.id` foreign key.

use super::user::UserId;
use serde::{Deserialize, Serialize};

/// Store-assigned surrogate key of a note row.
pub type NoteId = i64;

/// Persisted note row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// `None` for notes without an owner.
    pub user_id: Option<UserId>,
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Insert payload for a note row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub user_id: Option<UserId>,
    pub content: String,
    pub created_at: Option<i64>,
}

impl NewNote {
    pub fn new(user_id: Option<UserId>, content: impl Into<String>) -> Self {
        Self {
            user_id,
            content: content.into(),
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = Some(created_at);
        self
    }
}
