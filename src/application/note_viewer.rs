// src/application/note_viewer.rs
use crate::application::AttachmentStore;
use crate::domain::{DomainError, Note, NoteDraft};
use serde::Serialize;
use tracing::debug;
use url::Url;

#[allow(async_fn_in_trait)]
pub trait NoteRepository {
    async fn list_notes(&mut self) -> Result<Vec<Note>, DomainError>;

    async fn get_note(&mut self, id: &str) -> Result<Note, DomainError>;

    async fn create_note(&mut self, draft: &NoteDraft) -> Result<Note, DomainError>;

    async fn update_note(&mut self, id: &str, draft: &NoteDraft) -> Result<(), DomainError>;

    async fn delete_note(&mut self, id: &str) -> Result<(), DomainError>;
}

/// A loaded note with its attachment resolved to a retrieval URL.
#[derive(Debug, Clone, Serialize)]
pub struct NoteView {
    pub note: Note,
    pub attachment_url: Option<Url>,
}

pub struct NoteViewer<R: NoteRepository, S: AttachmentStore> {
    repository: R,
    store: S,
}

impl<R: NoteRepository, S: AttachmentStore> NoteViewer<R, S> {
    pub fn new(repository: R, store: S) -> Self {
        Self { repository, store }
    }

    pub async fn view_note(&mut self, note_id: &str) -> Result<NoteView, DomainError> {
        let note = self.repository.get_note(note_id).await?;
        let attachment_url = match note.attachment.as_deref() {
            Some(key) => Some(self.store.url(key).await?),
            None => None,
        };
        debug!(note_id, has_attachment = attachment_url.is_some(), "Loaded note");
        Ok(NoteView {
            note,
            attachment_url,
        })
    }

    pub fn into_parts(self) -> (R, S) {
        (self.repository, self.store)
    }
}
