// src/ports/text.rs
use chrono::Local;
use std::fmt::Write;

use crate::application::{Home, NoteView};
use crate::domain::Note;
use crate::util::text::excerpt;

const TITLE_WIDTH: usize = 60;

/// Terminal rendering of the home and note views.
#[derive(Debug, Default)]
pub struct TextPresenter;

impl TextPresenter {
    pub fn new() -> Self {
        Self
    }

    pub fn render_lander(&self) -> String {
        "Scratch\nA simple note taking app\n".to_string()
    }

    pub fn render_home(&self, home: &Home) -> String {
        match home {
            Home::Lander => self.render_lander(),
            Home::Notes(notes) => self.render_notes(notes),
        }
    }

    /// The list always starts with the entry for creating a note.
    fn render_notes(&self, notes: &[Note]) -> String {
        let mut out = String::from("Your Notes\n\n\u{FF0B} Create a new note  (scratch new <content>)\n");
        for note in notes {
            let _ = writeln!(
                out,
                "\n{}  [{}]\n  Created: {}",
                excerpt(note.title(), TITLE_WIDTH),
                note.note_id,
                note.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
            );
        }
        out
    }

    pub fn render_note(&self, view: &NoteView) -> String {
        let mut out = format!("{}\n", view.note.content);
        if let Some(name) = view.note.attachment_name() {
            let _ = writeln!(out, "\nAttachment: {name}");
            if let Some(url) = &view.attachment_url {
                let _ = writeln!(out, "  {url}");
            }
        }
        out
    }
}
