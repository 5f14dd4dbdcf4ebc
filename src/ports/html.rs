// src/ports/html.rs
use crate::application::NoteView;
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::instrument;

#[derive(Debug, Default)]
pub struct HtmlPresenter;

impl HtmlPresenter {
    pub fn new() -> Self {
        Self
    }

    fn render_attachment(&self, view: &NoteView) -> String {
        let (Some(name), Some(url)) = (view.note.attachment_name(), view.attachment_url.as_ref())
        else {
            return String::new();
        };
        format!(
            r#"<div class="attachment">
            <span class="label">Attachment</span>
            <a target="_blank" rel="noopener noreferrer" href="{href}">{name}</a>
        </div>"#,
            href = encode_double_quoted_attribute(url.as_str()),
            name = encode_text(name),
        )
    }

    #[instrument(level = "debug", skip_all, fields(note_id = %view.note.note_id))]
    pub fn render(&self, view: &NoteView) -> String {
        let note = &view.note;
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 2rem auto;
            padding: 0 1rem;
            background-color: #f5f5f5;
        }}
        .note {{
            background: white;
            border-radius: 8px;
            padding: 2rem;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        .content {{
            white-space: pre-wrap;
            word-wrap: break-word;
        }}
        .attachment {{
            margin-top: 1rem;
        }}
        .attachment .label {{
            font-weight: bold;
            margin-right: 0.5rem;
        }}
        .note-info {{
            margin-top: 1rem;
            padding-top: 1rem;
            border-top: 1px solid #eee;
            font-size: 0.9em;
            color: #666;
        }}
    </style>
</head>
<body>
    <div class="note">
        <div class="content">{content}</div>
        {attachment}
        <div class="note-info">
            <div>Note ID: {note_id}</div>
            <div>Created: {created}</div>
        </div>
    </div>
</body>
</html>"#,
            title = encode_text(note.title()),
            content = encode_text(&note.content),
            attachment = self.render_attachment(view),
            note_id = encode_text(&note.note_id),
            created = note.created_at.to_rfc2822(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::sample_note;
    use url::Url;

    #[test]
    fn given_markup_in_content_when_rendering_then_escapes_it() {
        let presenter = HtmlPresenter::new();
        let view = NoteView {
            note: sample_note("n1", "<script>alert(1)</script>\nsecond"),
            attachment_url: None,
        };

        let html = presenter.render(&view);

        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert"));
        assert!(!html.contains("class=\"attachment\""));
    }

    #[test]
    fn given_attachment_when_rendering_then_links_display_name() {
        let presenter = HtmlPresenter::new();
        let mut note = sample_note("n1", "Receipt");
        note.attachment = Some("1700000000000-receipt.pdf".to_string());
        let view = NoteView {
            note,
            attachment_url: Some(Url::parse("https://files.test/r?sig=a&b=c").unwrap()),
        };

        let html = presenter.render(&view);

        assert!(html.contains(">receipt.pdf</a>"));
        assert!(html.contains(r#"href="https://files.test/r?sig=a&amp;b=c""#));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
    }
}
