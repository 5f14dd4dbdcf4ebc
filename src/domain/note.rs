// src/domain/note.rs
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::domain::DomainError;

static TIMESTAMP_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+-").expect("valid timestamp prefix regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub note_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// First line of the trimmed content, used as the list header.
    pub fn title(&self) -> &str {
        self.content.trim().split('\n').next().unwrap_or_default()
    }

    pub fn attachment_name(&self) -> Option<&str> {
        self.attachment.as_deref().map(display_name)
    }
}

/// Request body for creating or updating a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub content: String,
    pub attachment: Option<String>,
}

impl NoteDraft {
    pub fn new(content: impl Into<String>, attachment: Option<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.is_empty() {
            return Err(DomainError::EmptyContent);
        }
        Ok(Self {
            content,
            attachment,
        })
    }
}

/// Storage key for an uploaded file: `{epoch_millis}-{file_name}`.
pub fn attachment_key(file_name: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}", now.timestamp_millis(), file_name)
}

/// Strips the upload timestamp from a storage key for display.
pub fn display_name(key: &str) -> &str {
    match TIMESTAMP_PREFIX.find(key) {
        Some(m) => &key[m.end()..],
        None => key,
    }
}
