// src/infrastructure/storage.rs
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::application::AttachmentStore;
use crate::domain::note::attachment_key;
use crate::domain::{AttachmentFile, DomainError};
use crate::infrastructure::http::{endpoint, send, Failure};

/// Client for the hosted object store.
///
/// Every transfer goes through a signed URL: the store signs a key for
/// `put` or `get` and the bytes move directly against that URL.
pub struct HttpAttachmentStore {
    http: Client,
    base_url: String,
    access_token: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum Operation {
    Put,
    Get,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest<'a> {
    key: &'a str,
    operation: Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<&'a str>,
}

#[derive(Deserialize)]
struct SignResponse {
    url: Url,
}

fn storage_error(failure: Failure) -> DomainError {
    match failure {
        Failure::Transport(reason) => DomainError::Unreachable(reason),
        Failure::Status(_, message) => DomainError::StorageError(message),
    }
}

impl HttpAttachmentStore {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    async fn sign(&self, request: &SignRequest<'_>) -> Result<Url, DomainError> {
        let request = self
            .http
            .post(endpoint(&self.base_url, "sign"))
            .bearer_auth(&self.access_token)
            .json(request);
        let signed: SignResponse = send(request)
            .await
            .map_err(storage_error)?
            .json()
            .await
            .map_err(|e| DomainError::StorageError(format!("Failed to parse signed URL: {e}")))?;
        Ok(signed.url)
    }
}

impl AttachmentStore for HttpAttachmentStore {
    #[instrument(level = "debug", skip(self, file), fields(name = %file.name, size = file.size()))]
    async fn put(&mut self, file: &AttachmentFile) -> Result<String, DomainError> {
        let key = attachment_key(&file.name, Utc::now());
        let upload_url = self
            .sign(&SignRequest {
                key: &key,
                operation: Operation::Put,
                content_type: Some(&file.content_type),
            })
            .await?;

        let upload = self
            .http
            .put(upload_url)
            .header(reqwest::header::CONTENT_TYPE, &file.content_type)
            .body(file.bytes.clone());
        send(upload).await.map_err(storage_error)?;

        debug!(%key, "Stored attachment");
        Ok(key)
    }

    #[instrument(level = "debug", skip(self))]
    async fn url(&mut self, key: &str) -> Result<Url, DomainError> {
        self.sign(&SignRequest {
            key,
            operation: Operation::Get,
            content_type: None,
        })
        .await
    }
}
