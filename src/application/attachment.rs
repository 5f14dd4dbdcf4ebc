// src/application/attachment.rs
use crate::domain::{AttachmentFile, DomainError};
use url::Url;

/// Object storage for note attachments.
#[allow(async_fn_in_trait)]
pub trait AttachmentStore {
    /// Upload a file and return the storage key it was saved under.
    async fn put(&mut self, file: &AttachmentFile) -> Result<String, DomainError>;

    /// Resolve a storage key to a signed retrieval URL.
    async fn url(&mut self, key: &str) -> Result<Url, DomainError>;
}
