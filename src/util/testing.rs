// src/util/testing.rs

use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::BTreeMap;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};
use url::Url;

use crate::application::{AttachmentStore, IdentityProvider, NoteRepository, SessionStore};
use crate::domain::note::attachment_key;
use crate::domain::{AttachmentFile, DomainError, NewUser, Note, NoteDraft, Session};

/// A note with fixed timestamps for assertions.
pub fn sample_note(id: &str, content: &str) -> Note {
    Note {
        note_id: id.to_string(),
        user_id: Some("user-1".to_string()),
        content: content.to_string(),
        attachment: None,
        created_at: Utc
            .timestamp_millis_opt(1_700_000_000_000)
            .single()
            .unwrap_or_default(),
    }
}

pub fn sample_session(expires_at: DateTime<Utc>) -> Session {
    Session {
        username: "ada@example.com".to_string(),
        id_token: "id-token".to_string(),
        access_token: "access-token".to_string(),
        refresh_token: "refresh-token".to_string(),
        expires_at,
    }
}

/// Shared mock repository for testing use cases that depend on NoteRepository
///
/// Notes live in memory keyed by id; every mutating call is recorded so tests
/// can assert what would have been sent to the API.
///
/// # Examples
///
/// ```
/// use scratch::util::testing::{sample_note, MockNoteRepository};
///
/// let mock = MockNoteRepository::builder()
///     .with_note(sample_note("n1", "Groceries"))
///     .build();
/// assert!(mock.created().is_empty());
/// ```
pub struct MockNoteRepository {
    notes: BTreeMap<String, Note>,
    list_error: Option<DomainError>,
    created: Vec<NoteDraft>,
    updated: Vec<(String, NoteDraft)>,
    deleted: Vec<String>,
}

impl MockNoteRepository {
    pub fn builder() -> MockNoteRepositoryBuilder {
        MockNoteRepositoryBuilder::new()
    }

    pub fn created(&self) -> &[NoteDraft] {
        &self.created
    }

    pub fn updated(&self) -> &[(String, NoteDraft)] {
        &self.updated
    }

    pub fn deleted(&self) -> &[String] {
        &self.deleted
    }
}

impl NoteRepository for MockNoteRepository {
    async fn list_notes(&mut self) -> Result<Vec<Note>, DomainError> {
        if let Some(err) = self.list_error.take() {
            return Err(err);
        }
        Ok(self.notes.values().cloned().collect())
    }

    async fn get_note(&mut self, id: &str) -> Result<Note, DomainError> {
        self.notes
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::NoteNotFound(id.to_string()))
    }

    async fn create_note(&mut self, draft: &NoteDraft) -> Result<Note, DomainError> {
        self.created.push(draft.clone());
        let note = Note {
            note_id: format!("note-{}", self.created.len()),
            user_id: Some("user-1".to_string()),
            content: draft.content.clone(),
            attachment: draft.attachment.clone(),
            created_at: Utc::now(),
        };
        self.notes.insert(note.note_id.clone(), note.clone());
        Ok(note)
    }

    async fn update_note(&mut self, id: &str, draft: &NoteDraft) -> Result<(), DomainError> {
        let note = self
            .notes
            .get_mut(id)
            .ok_or_else(|| DomainError::NoteNotFound(id.to_string()))?;
        note.content = draft.content.clone();
        note.attachment = draft.attachment.clone();
        self.updated.push((id.to_string(), draft.clone()));
        Ok(())
    }

    async fn delete_note(&mut self, id: &str) -> Result<(), DomainError> {
        self.notes
            .remove(id)
            .ok_or_else(|| DomainError::NoteNotFound(id.to_string()))?;
        self.deleted.push(id.to_string());
        Ok(())
    }
}

/// Builder for MockNoteRepository
///
/// Provides a fluent interface for configuring mock behavior.
pub struct MockNoteRepositoryBuilder {
    notes: BTreeMap<String, Note>,
    list_error: Option<DomainError>,
}

impl MockNoteRepositoryBuilder {
    pub fn new() -> Self {
        Self {
            notes: BTreeMap::new(),
            list_error: None,
        }
    }

    /// Add a note that can be retrieved, updated or deleted by its id
    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.insert(note.note_id.clone(), note);
        self
    }

    /// Make the next list_notes call fail
    pub fn with_list_error(mut self, error: DomainError) -> Self {
        self.list_error = Some(error);
        self
    }

    pub fn build(self) -> MockNoteRepository {
        MockNoteRepository {
            notes: self.notes,
            list_error: self.list_error,
            created: vec![],
            updated: vec![],
            deleted: vec![],
        }
    }
}

impl Default for MockNoteRepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Attachment store resolving keys against a fixed base URL.
pub struct MockAttachmentStore {
    base: String,
    failure: Option<String>,
    uploaded: Vec<String>,
    resolved: Vec<String>,
}

impl MockAttachmentStore {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.to_string(),
            failure: None,
            uploaded: vec![],
            resolved: vec![],
        }
    }

    /// Every call fails with a storage error.
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::new("http://unused.invalid/")
        }
    }

    /// Names of uploaded files, in order.
    pub fn uploaded(&self) -> &[String] {
        &self.uploaded
    }

    pub fn resolved(&self) -> &[String] {
        &self.resolved
    }
}

impl AttachmentStore for MockAttachmentStore {
    async fn put(&mut self, file: &AttachmentFile) -> Result<String, DomainError> {
        if let Some(reason) = &self.failure {
            return Err(DomainError::StorageError(reason.clone()));
        }
        self.uploaded.push(file.name.clone());
        Ok(attachment_key(&file.name, Utc::now()))
    }

    async fn url(&mut self, key: &str) -> Result<Url, DomainError> {
        if let Some(reason) = &self.failure {
            return Err(DomainError::StorageError(reason.clone()));
        }
        self.resolved.push(key.to_string());
        Url::parse(&self.base)
            .and_then(|base| base.join(key))
            .map_err(|e| DomainError::StorageError(e.to_string()))
    }
}

/// Identity service double that records which operations were called.
pub struct MockIdentityProvider {
    password: Option<String>,
    existing_users: Vec<String>,
    reject_refresh: bool,
    refresh_unreachable: bool,
    fail_sign_out: bool,
    calls: Vec<&'static str>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self {
            password: None,
            existing_users: vec![],
            reject_refresh: false,
            refresh_unreachable: false,
            fail_sign_out: false,
            calls: vec![],
        }
    }

    /// Only this password signs in; any password does by default.
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Sign-up for this email reports that the user already exists.
    pub fn with_existing_user(mut self, email: &str) -> Self {
        self.existing_users.push(email.to_string());
        self
    }

    pub fn rejecting_refresh(mut self) -> Self {
        self.reject_refresh = true;
        self
    }

    /// Refresh fails without an answer from the service.
    pub fn unreachable_refresh(mut self) -> Self {
        self.refresh_unreachable = true;
        self
    }

    pub fn failing_sign_out(mut self) -> Self {
        self.fail_sign_out = true;
        self
    }

    pub fn calls(&self) -> &[&'static str] {
        &self.calls
    }

    fn session_for(email: &str, access_token: &str) -> Session {
        Session {
            access_token: access_token.to_string(),
            username: email.to_string(),
            ..sample_session(Utc::now() + Duration::hours(1))
        }
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for MockIdentityProvider {
    async fn sign_up(&mut self, email: &str, _password: &str) -> Result<NewUser, DomainError> {
        self.calls.push("sign_up");
        if self.existing_users.iter().any(|u| u == email) {
            return Err(DomainError::UsernameExists(email.to_string()));
        }
        Ok(NewUser {
            username: email.to_string(),
            user_sub: Some("sub-1".to_string()),
            confirmed: false,
        })
    }

    async fn confirm_sign_up(&mut self, _email: &str, _code: &str) -> Result<(), DomainError> {
        self.calls.push("confirm_sign_up");
        Ok(())
    }

    async fn resend_sign_up(&mut self, _email: &str) -> Result<(), DomainError> {
        self.calls.push("resend_sign_up");
        Ok(())
    }

    async fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, DomainError> {
        self.calls.push("sign_in");
        match &self.password {
            Some(expected) if expected != password => Err(DomainError::AuthError(
                "Incorrect username or password.".to_string(),
            )),
            _ => Ok(Self::session_for(email, "access-token")),
        }
    }

    async fn refresh(&mut self, session: &Session) -> Result<Session, DomainError> {
        self.calls.push("refresh");
        if self.reject_refresh {
            return Err(DomainError::AuthError("Refresh Token has expired".to_string()));
        }
        if self.refresh_unreachable {
            return Err(DomainError::Unreachable("connection refused".to_string()));
        }
        Ok(Self::session_for(&session.username, "refreshed-access"))
    }

    async fn sign_out(&mut self, _session: &Session) -> Result<(), DomainError> {
        self.calls.push("sign_out");
        if self.fail_sign_out {
            return Err(DomainError::Unreachable("connection refused".to_string()));
        }
        Ok(())
    }
}

/// Session store kept in memory.
#[derive(Default)]
pub struct MemorySessionStore {
    session: RefCell<Option<Session>>,
}

impl MemorySessionStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(session: Session) -> Self {
        Self {
            session: RefCell::new(Some(session)),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.session.borrow().clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, DomainError> {
        Ok(self.current())
    }

    fn save(&self, session: &Session) -> Result<(), DomainError> {
        *self.session.borrow_mut() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), DomainError> {
        *self.session.borrow_mut() = None;
        Ok(())
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "mio", "wiremock"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    // Build and set the subscriber
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
