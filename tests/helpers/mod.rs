use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use chrono::{Duration, Utc};
use scratch::application::SessionStore;
use scratch::domain::Session;
use scratch::infrastructure::FileSessionStore;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::MockServer;

/// Isolated `SCRATCH_HOME` with every service pointed at one mock server.
#[allow(dead_code)]
pub struct TestHome {
    dir: TempDir,
    pub base_url: String,
}

#[allow(dead_code)]
impl TestHome {
    pub fn new(server: &MockServer) -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
            base_url: server.uri(),
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.path().join("session.json")
    }

    /// Stores a session that stays valid for an hour.
    pub fn sign_in(&self) -> Session {
        let session = Session {
            username: "ada@example.com".to_string(),
            id_token: "id-token".to_string(),
            access_token: "access-token".to_string(),
            refresh_token: "refresh-token".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        };
        FileSessionStore::new(self.session_path())
            .save(&session)
            .expect("save session");
        session
    }

    pub fn stored_session(&self) -> Option<Session> {
        FileSessionStore::new(self.session_path())
            .load()
            .expect("load session")
    }

    pub fn command(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("scratch");
        cmd.env("SCRATCH_HOME", self.dir.path())
            .env("SCRATCH_API_URL", &self.base_url)
            .env("SCRATCH_IDENTITY_URL", &self.base_url)
            .env("SCRATCH_STORAGE_URL", &self.base_url)
            .env_remove("SCRATCH_PASSWORD")
            .env_remove("RUST_LOG");
        cmd
    }
}

/// A note as the API sends it.
#[allow(dead_code)]
pub fn note_json(id: &str, content: &str) -> Value {
    json!({
        "noteId": id,
        "userId": "user-1",
        "content": content,
        "attachment": null,
        "createdAt": 1_700_000_000_000_i64,
    })
}

#[allow(dead_code)]
pub fn tokens_json() -> Value {
    json!({
        "idToken": "new-id",
        "accessToken": "new-access",
        "refreshToken": "new-refresh",
        "expiresIn": 3600,
    })
}
