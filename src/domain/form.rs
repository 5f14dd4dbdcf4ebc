// src/domain/form.rs
//! Form state for the login, signup, confirmation and note views.
//!
//! Each form tracks whether its submission is in flight. While it is, the
//! submit control stays disabled and a second submission is refused.
use crate::domain::DomainError;

/// In-flight flag of a form's submit control.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Loader {
    loading: bool,
}

impl Loader {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn begin(&mut self) -> Result<(), DomainError> {
        if self.loading {
            return Err(DomainError::SubmissionInProgress);
        }
        self.loading = true;
        Ok(())
    }

    pub fn finish(&mut self) {
        self.loading = false;
    }
}

#[derive(Debug, Default, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub loader: Loader,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            loader: Loader::default(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.email.is_empty() {
            return Err(DomainError::InvalidForm("Email is required"));
        }
        if self.password.is_empty() {
            return Err(DomainError::InvalidForm("Password is required"));
        }
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok() && !self.loader.is_loading()
    }
}

#[derive(Debug, Default, Clone)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub loader: Loader,
}

impl SignupForm {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
            loader: Loader::default(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.email.is_empty() {
            return Err(DomainError::InvalidForm("Email is required"));
        }
        if self.password.is_empty() {
            return Err(DomainError::InvalidForm("Password is required"));
        }
        if self.password != self.confirm_password {
            return Err(DomainError::InvalidForm("Passwords do not match"));
        }
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok() && !self.loader.is_loading()
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfirmationForm {
    pub email: String,
    pub code: String,
    pub loader: Loader,
}

impl ConfirmationForm {
    pub fn new(email: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            code: code.into(),
            loader: Loader::default(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.code.is_empty() {
            return Err(DomainError::InvalidForm("Confirmation code is required"));
        }
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok() && !self.loader.is_loading()
    }
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AttachmentFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Default, Clone)]
pub struct NoteForm {
    pub content: String,
    pub file: Option<AttachmentFile>,
    pub loader: Loader,
}

impl NoteForm {
    pub fn new(content: impl Into<String>, file: Option<AttachmentFile>) -> Self {
        Self {
            content: content.into(),
            file,
            loader: Loader::default(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.content.is_empty() {
            return Err(DomainError::EmptyContent);
        }
        Ok(())
    }

    /// Rejects a picked file above `max` bytes.
    pub fn check_attachment_size(&self, max: u64) -> Result<(), DomainError> {
        match &self.file {
            Some(file) if file.size() > max => Err(DomainError::AttachmentTooLarge {
                size: file.size(),
                max,
            }),
            _ => Ok(()),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok() && !self.loader.is_loading()
    }
}
