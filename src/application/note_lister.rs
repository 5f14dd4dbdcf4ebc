// src/application/note_lister.rs
use crate::application::NoteRepository;
use crate::domain::{DomainError, Note};

/// What the home view shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Home {
    /// Signed-out landing page.
    Lander,
    Notes(Vec<Note>),
}

pub struct NoteLister<R: NoteRepository> {
    repository: R,
}

impl<R: NoteRepository> NoteLister<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Build the home view. Notes are only fetched for a signed-in user.
    pub async fn home(&mut self, is_authenticated: bool) -> Result<Home, DomainError> {
        if !is_authenticated {
            return Ok(Home::Lander);
        }
        let notes = self.repository.list_notes().await?;
        Ok(Home::Notes(notes))
    }
}
