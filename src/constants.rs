// src/constants.rs
//
// Application-wide constants shared across layers.

/// Largest attachment accepted for upload, in bytes (5MB).
///
/// Used in: `infrastructure/config.rs`, `application/note_editor.rs`
pub const MAX_ATTACHMENT_SIZE: u64 = 5_000_000;

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";

/// Query parameter carrying the post-login target.
pub const REDIRECT_PARAM: &str = "redirect";

/// Seconds before the real expiry at which a session is treated as expired,
/// so a token is never sent just as it lapses.
///
/// Used in: `domain/session.rs`
pub const TOKEN_EXPIRY_SKEW_SECS: i64 = 60;

pub const CONFIG_FILE: &str = "config.toml";
pub const SESSION_FILE: &str = "session.json";

/// Directory name under the platform config/data directories.
pub const APP_DIR: &str = "scratch";

/// Environment variable overriding the config and data directory.
pub const HOME_ENV: &str = "SCRATCH_HOME";

/// Delay in milliseconds after writing the HTML file before returning.
///
/// The browser is launched asynchronously and needs the temp file to still be
/// there when it reads it.
///
/// Used in: `infrastructure/renderer.rs`
pub const BROWSER_LAUNCH_DELAY_MS: u64 = 500;

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this note?";
