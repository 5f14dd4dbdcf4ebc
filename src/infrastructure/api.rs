// src/infrastructure/api.rs
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, instrument};

use crate::application::NoteRepository;
use crate::domain::{DomainError, Note, NoteDraft};
use crate::infrastructure::http::{endpoint, send, Failure};

/// Client for the hosted notes API.
pub struct HttpNoteRepository {
    http: Client,
    base_url: String,
    access_token: String,
}

impl HttpNoteRepository {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    fn notes_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => endpoint(&self.base_url, &format!("notes/{id}")),
            None => endpoint(&self.base_url, "notes"),
        }
    }

    async fn send(&self, request: RequestBuilder, note_id: Option<&str>) -> Result<reqwest::Response, DomainError> {
        send(request.bearer_auth(&self.access_token))
            .await
            .map_err(|failure| api_error(failure, note_id))
    }
}

fn api_error(failure: Failure, note_id: Option<&str>) -> DomainError {
    match (failure, note_id) {
        (Failure::Transport(reason), _) => DomainError::Unreachable(reason),
        (Failure::Status(StatusCode::NOT_FOUND, _), Some(id)) => DomainError::NoteNotFound(id.to_string()),
        (Failure::Status(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, message), _) => {
            DomainError::AuthError(message)
        }
        (Failure::Status(_, message), _) => DomainError::ApiError(message),
    }
}

fn decode_error(e: reqwest::Error) -> DomainError {
    DomainError::ApiError(format!("Failed to parse API response: {e}"))
}

impl NoteRepository for HttpNoteRepository {
    #[instrument(level = "debug", skip(self))]
    async fn list_notes(&mut self) -> Result<Vec<Note>, DomainError> {
        let request = self.http.get(self.notes_url(None));
        let notes: Vec<Note> = self.send(request, None).await?.json().await.map_err(decode_error)?;
        debug!(count = notes.len(), "Listed notes");
        Ok(notes)
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_note(&mut self, id: &str) -> Result<Note, DomainError> {
        let request = self.http.get(self.notes_url(Some(id)));
        self.send(request, Some(id)).await?.json().await.map_err(decode_error)
    }

    #[instrument(level = "debug", skip(self, draft))]
    async fn create_note(&mut self, draft: &NoteDraft) -> Result<Note, DomainError> {
        let request = self.http.post(self.notes_url(None)).json(draft);
        self.send(request, None).await?.json().await.map_err(decode_error)
    }

    #[instrument(level = "debug", skip(self, draft))]
    async fn update_note(&mut self, id: &str, draft: &NoteDraft) -> Result<(), DomainError> {
        let request = self.http.put(self.notes_url(Some(id))).json(draft);
        self.send(request, Some(id)).await?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_note(&mut self, id: &str) -> Result<(), DomainError> {
        let request = self.http.delete(self.notes_url(Some(id)));
        self.send(request, Some(id)).await?;
        Ok(())
    }
}
