// src/application/mod.rs
pub mod attachment;
pub mod auth;
pub mod note_deleter;
pub mod note_editor;
pub mod note_lister;
pub mod note_viewer;

pub use attachment::AttachmentStore;
pub use auth::{Authenticator, IdentityProvider, SessionStore};
pub use note_deleter::{DeleteOutcome, NoteDeleter};
pub use note_editor::NoteEditor;
pub use note_lister::{Home, NoteLister};
pub use note_viewer::{NoteRepository, NoteView, NoteViewer};
