// src/infrastructure/renderer.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tempfile::{Builder, TempDir};
use tracing::{debug, instrument};

use crate::constants::BROWSER_LAUNCH_DELAY_MS;

const BROWSER_ENV: &str = "BROWSER";

/// Writes rendered pages to a temp directory and opens them in the browser.
#[derive(Debug, Default)]
pub struct BrowserRenderer {
    // Dropping the dir deletes the page, so the last one is held here
    page_dir: Option<TempDir>,
}

impl BrowserRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_temp_file(&mut self, content: &str) -> Result<PathBuf> {
        let dir = Builder::new()
            .prefix("scratch-note-")
            .tempdir()
            .context("Failed to create temporary directory")?;

        let page = dir.path().join("note.html");
        std::fs::write(&page, content)
            .with_context(|| format!("Failed to write page to {}", page.display()))?;

        self.page_dir = Some(dir);
        Ok(page)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn open_in_browser(&mut self, path: &Path) -> Result<()> {
        let mut command = launcher(std::env::var(BROWSER_ENV).ok().as_deref());
        command.arg(path);
        debug!(?command, "Launching browser");
        command
            .spawn()
            .with_context(|| format!("Failed to open {} in the browser", path.display()))?;

        // The browser reads the file after spawn returns
        std::thread::sleep(Duration::from_millis(BROWSER_LAUNCH_DELAY_MS));
        Ok(())
    }
}

/// `$BROWSER` when set, otherwise the platform's opener.
fn launcher(browser: Option<&str>) -> Command {
    if let Some(browser) = browser.filter(|b| !b.trim().is_empty()) {
        return Command::new(browser.trim());
    }
    if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    }
}
