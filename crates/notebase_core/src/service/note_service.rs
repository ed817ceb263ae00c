//! Note use-case service.
//!
//! # Responsibility
//! - Create, edit, list and remove notes for an owner.
//!
//! # Invariants
//! - Blank content is rejected on create and update.
//! - Owner listings are newest first.

use crate::model::note::{NewNote, Note, NoteId};
use crate::model::user::UserId;
use crate::repo::note_repo::{NoteListQuery, NoteRepository, OwnerFilter};
use crate::repo::RepoError;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    EmptyContent,
    NoteNotFound(NoteId),
    /// The requested owner does not exist.
    UnknownOwner(UserId),
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "note content is empty"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::UnknownOwner(id) => write!(f, "note owner does not exist: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NoteNotFound(id) => Self::NoteNotFound(id),
            RepoError::UnknownOwner(id) => Self::UnknownOwner(id),
            other => Self::Repo(other),
        }
    }
}

/// Note service facade over a note repository.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a new note; `owner = None` creates an unowned note.
    pub fn create_note(
        &self,
        owner: Option<UserId>,
        content: impl Into<String>,
    ) -> Result<Note, NoteServiceError> {
        let content = content.into();
        ensure_content(&content)?;
        let note = self.repo.create_note(&NewNote::new(owner, content))?;
        debug!(
            "event=note_create module=service status=ok note_id={} owned={}",
            note.id,
            note.user_id.is_some()
        );
        Ok(note)
    }

    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>, NoteServiceError> {
        Ok(self.repo.get_note(id)?)
    }

    /// Lists one owner's notes, newest first.
    pub fn list_notes_for_user(&self, user_id: UserId) -> Result<Vec<Note>, NoteServiceError> {
        Ok(self.repo.list_notes(&NoteListQuery::for_user(user_id))?)
    }

    /// Replaces note content and returns the stored row.
    pub fn update_note(
        &self,
        id: NoteId,
        content: impl Into<String>,
    ) -> Result<Note, NoteServiceError> {
        let content = content.into();
        ensure_content(&content)?;
        self.repo.update_note_content(id, &content)?;
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))
    }

    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        self.repo.delete_note(id)?;
        debug!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    /// Removes every note of one owner. Returns the number removed.
    pub fn clear_notes(&self, user_id: UserId) -> Result<usize, NoteServiceError> {
        let removed = self.repo.delete_notes_for_user(user_id)?;
        debug!(
            "event=note_clear module=service status=ok user_id={} removed={}",
            user_id, removed
        );
        Ok(removed)
    }

    pub fn count_notes(&self, owner: OwnerFilter) -> Result<u64, NoteServiceError> {
        Ok(self.repo.count_notes(owner)?)
    }
}

fn ensure_content(content: &str) -> Result<(), NoteServiceError> {
    if content.trim().is_empty() {
        return Err(NoteServiceError::EmptyContent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_content, NoteServiceError};

    #[test]
    fn whitespace_only_content_is_empty() {
        assert!(matches!(
            ensure_content(" \n\t "),
            Err(NoteServiceError::EmptyContent)
        ));
        assert!(ensure_content("x").is_ok());
    }
}
