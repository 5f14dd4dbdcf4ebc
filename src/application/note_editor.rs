// src/application/note_editor.rs
use crate::application::{AttachmentStore, NoteRepository};
use crate::domain::{DomainError, Note, NoteDraft, NoteForm};
use tracing::{debug, info};

/// Creates and saves notes, uploading a picked file first.
pub struct NoteEditor<R: NoteRepository, S: AttachmentStore> {
    repository: R,
    store: S,
    max_attachment_size: u64,
}

impl<R: NoteRepository, S: AttachmentStore> NoteEditor<R, S> {
    pub fn new(repository: R, store: S, max_attachment_size: u64) -> Self {
        Self {
            repository,
            store,
            max_attachment_size,
        }
    }

    pub async fn create(&mut self, form: &mut NoteForm) -> Result<Note, DomainError> {
        form.validate()?;
        form.check_attachment_size(self.max_attachment_size)?;
        form.loader.begin()?;

        let result = self.submit_create(form).await;
        form.loader.finish();
        if let Ok(note) = &result {
            info!(note_id = %note.note_id, "Created note");
        }
        result
    }

    /// Save edits to `existing`. A newly picked file replaces the attachment;
    /// otherwise the current one is kept. Replaced files are not deleted.
    pub async fn save(&mut self, existing: &Note, form: &mut NoteForm) -> Result<(), DomainError> {
        form.validate()?;
        form.check_attachment_size(self.max_attachment_size)?;
        form.loader.begin()?;

        let result = self.submit_save(existing, form).await;
        form.loader.finish();
        if result.is_ok() {
            info!(note_id = %existing.note_id, "Saved note");
        }
        result
    }

    async fn submit_create(&mut self, form: &NoteForm) -> Result<Note, DomainError> {
        let attachment = self.upload(form).await?;
        let draft = NoteDraft::new(form.content.clone(), attachment)?;
        self.repository.create_note(&draft).await
    }

    async fn submit_save(&mut self, existing: &Note, form: &NoteForm) -> Result<(), DomainError> {
        let attachment = self
            .upload(form)
            .await?
            .or_else(|| existing.attachment.clone());
        let draft = NoteDraft::new(form.content.clone(), attachment)?;
        self.repository.update_note(&existing.note_id, &draft).await
    }

    async fn upload(&mut self, form: &NoteForm) -> Result<Option<String>, DomainError> {
        match &form.file {
            Some(file) => {
                let key = self.store.put(file).await?;
                debug!(%key, size = file.size(), "Uploaded attachment");
                Ok(Some(key))
            }
            None => Ok(None),
        }
    }

    pub fn into_parts(self) -> (R, S) {
        (self.repository, self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AttachmentFile;
    use crate::util::testing::{sample_note, MockAttachmentStore, MockNoteRepository};

    fn file(name: &str, size: usize) -> AttachmentFile {
        AttachmentFile {
            name: name.to_string(),
            content_type: "text/plain".to_string(),
            bytes: vec![b'x'; size],
        }
    }

    fn editor(repo: MockNoteRepository) -> NoteEditor<MockNoteRepository, MockAttachmentStore> {
        NoteEditor::new(repo, MockAttachmentStore::new("https://files.test/"), 10)
    }

    #[tokio::test]
    async fn given_empty_content_when_creating_then_rejects_before_any_call() {
        // Arrange
        let mut editor = editor(MockNoteRepository::builder().build());
        let mut form = NoteForm::new("", Some(file("a.txt", 1)));

        // Act
        let result = editor.create(&mut form).await;

        // Assert
        assert!(matches!(result, Err(DomainError::EmptyContent)));
        let (repo, store) = editor.into_parts();
        assert!(repo.created().is_empty());
        assert!(store.uploaded().is_empty());
    }

    #[tokio::test]
    async fn given_oversized_file_when_creating_then_rejects_before_upload() {
        let mut editor = editor(MockNoteRepository::builder().build());
        let mut form = NoteForm::new("hello", Some(file("big.txt", 11)));

        let result = editor.create(&mut form).await;

        assert!(matches!(
            result,
            Err(DomainError::AttachmentTooLarge { size: 11, max: 10 })
        ));
        assert!(!form.loader.is_loading());
        let (_, store) = editor.into_parts();
        assert!(store.uploaded().is_empty());
    }

    #[tokio::test]
    async fn given_file_when_creating_then_uploads_and_posts_key() {
        let mut editor = editor(MockNoteRepository::builder().build());
        let mut form = NoteForm::new("with file", Some(file("a.txt", 3)));

        let note = editor.create(&mut form).await.expect("create succeeds");

        assert_eq!(note.content, "with file");
        assert!(!form.loader.is_loading());
        let (repo, store) = editor.into_parts();
        assert_eq!(store.uploaded(), ["a.txt".to_string()]);
        let drafts = repo.created();
        assert_eq!(drafts.len(), 1);
        let key = drafts[0].attachment.as_deref().expect("attachment key posted");
        assert!(key.ends_with("-a.txt"));
    }

    #[tokio::test]
    async fn given_no_new_file_when_saving_then_keeps_existing_attachment() {
        let mut existing = sample_note("n1", "old");
        existing.attachment = Some("1-old.pdf".to_string());
        let mut editor = editor(MockNoteRepository::builder().with_note(existing.clone()).build());
        let mut form = NoteForm::new("new text", None);

        editor.save(&existing, &mut form).await.expect("save succeeds");

        let (repo, _) = editor.into_parts();
        let updates = repo.updated();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, "n1");
        assert_eq!(updates[0].1.content, "new text");
        assert_eq!(updates[0].1.attachment.as_deref(), Some("1-old.pdf"));
    }

    #[tokio::test]
    async fn given_new_file_when_saving_then_replaces_attachment() {
        let mut existing = sample_note("n1", "old");
        existing.attachment = Some("1-old.pdf".to_string());
        let mut editor = editor(MockNoteRepository::builder().with_note(existing.clone()).build());
        let mut form = NoteForm::new("new text", Some(file("new.pdf", 2)));

        editor.save(&existing, &mut form).await.expect("save succeeds");

        let (repo, _) = editor.into_parts();
        let attachment = repo.updated()[0].1.attachment.clone().expect("attachment set");
        assert!(attachment.ends_with("-new.pdf"));
    }

    #[tokio::test]
    async fn given_upload_failure_when_creating_then_reenables_form_and_skips_post() {
        let repo = MockNoteRepository::builder().build();
        let store = MockAttachmentStore::failing("bucket unavailable");
        let mut editor = NoteEditor::new(repo, store, 10);
        let mut form = NoteForm::new("hello", Some(file("a.txt", 1)));

        let result = editor.create(&mut form).await;

        assert!(matches!(result, Err(DomainError::StorageError(_))));
        assert!(form.can_submit());
        let (repo, _) = editor.into_parts();
        assert!(repo.created().is_empty());
    }
}
