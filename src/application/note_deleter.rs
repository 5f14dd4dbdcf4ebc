// src/application/note_deleter.rs
use crate::application::NoteRepository;
use crate::constants::DELETE_CONFIRMATION;
use crate::domain::DomainError;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

pub struct NoteDeleter<R: NoteRepository> {
    repository: R,
}

impl<R: NoteRepository> NoteDeleter<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Delete a note once `confirm` accepts the confirmation question.
    ///
    /// The attachment of a deleted note stays in storage.
    pub async fn delete_note<F>(&mut self, note_id: &str, confirm: F) -> Result<DeleteOutcome, DomainError>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(DELETE_CONFIRMATION) {
            return Ok(DeleteOutcome::Cancelled);
        }
        self.repository.delete_note(note_id).await?;
        info!(note_id, "Deleted note");
        Ok(DeleteOutcome::Deleted)
    }

    pub fn into_inner(self) -> R {
        self.repository
    }
}
