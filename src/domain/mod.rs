// src/domain/mod.rs
pub mod error;
pub mod form;
pub mod note;
pub mod route;
pub mod session;

pub use error::DomainError;
pub use form::{AttachmentFile, ConfirmationForm, Loader, LoginForm, NoteForm, SignupForm};
pub use note::{Note, NoteDraft};
pub use route::{Location, Route, RouteDecision, Router};
pub use session::{NewUser, Session};
