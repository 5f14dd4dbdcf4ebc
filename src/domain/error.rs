// src/domain/error.rs
use thiserror::Error;

use crate::util::text::format_size;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error("Note content must not be empty")]
    EmptyContent,
    #[error("Please pick a file smaller than {}", format_size(*.max))]
    AttachmentTooLarge { size: u64, max: u64 },
    #[error("{0}")]
    InvalidForm(&'static str),
    #[error("A submission is already in progress")]
    SubmissionInProgress,
    #[error("No current user")]
    NoCurrentUser,
    #[error("User already exists: {0}")]
    UsernameExists(String),
    /// The identity service refused the request.
    #[error("Authentication error: {0}")]
    AuthError(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Session store error: {0}")]
    SessionError(String),
    /// The service answered but failed on its side (5xx).
    #[error("Service error: {0}")]
    ServiceError(String),
    #[error("Service unreachable: {0}")]
    Unreachable(String),
}
