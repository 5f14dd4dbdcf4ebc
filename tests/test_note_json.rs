use anyhow::Result;
use chrono::{TimeZone, Utc};
use scratch::domain::{Note, NoteDraft};
use serde_json::json;

#[test]
fn given_api_payload_when_deserializing_then_reads_camel_case_and_millis() -> Result<()> {
    // Arrange
    let payload = json!({
        "noteId": "abc",
        "userId": "user-1",
        "content": "Groceries\nmilk",
        "attachment": "1700000000000-list.pdf",
        "createdAt": 1_700_000_000_000_i64,
    });

    // Act
    let note: Note = serde_json::from_value(payload)?;

    // Assert
    assert_eq!(note.note_id, "abc");
    assert_eq!(note.user_id.as_deref(), Some("user-1"));
    assert_eq!(note.attachment_name(), Some("list.pdf"));
    assert_eq!(note.created_at, Utc.timestamp_millis_opt(1_700_000_000_000).unwrap());
    Ok(())
}

#[test]
fn given_payload_without_optional_fields_when_deserializing_then_defaults_to_none() -> Result<()> {
    // Arrange
    let payload = json!({ "noteId": "abc", "content": "x", "createdAt": 0 });

    // Act
    let note: Note = serde_json::from_value(payload)?;

    // Assert
    assert_eq!(note.user_id, None);
    assert_eq!(note.attachment, None);
    Ok(())
}

#[test]
fn given_note_when_serializing_then_uses_camel_case_fields() -> Result<()> {
    // Arrange
    let note = Note {
        note_id: "abc".to_string(),
        user_id: None,
        content: "x".to_string(),
        attachment: None,
        created_at: Utc.timestamp_millis_opt(42).unwrap(),
    };

    // Act
    let json = serde_json::to_string(&note)?;

    // Assert - field names should be camelCase, not snake_case
    assert!(json.contains(r#""noteId":"abc""#));
    assert!(json.contains(r#""createdAt":42"#));
    assert!(!json.contains("note_id"));
    assert!(!json.contains("userId"));
    Ok(())
}

#[test]
fn given_draft_without_attachment_when_serializing_then_sends_null() -> Result<()> {
    // Arrange
    let draft = NoteDraft::new("Groceries", None)?;

    // Act
    let json = serde_json::to_value(&draft)?;

    // Assert
    assert_eq!(json, json!({ "content": "Groceries", "attachment": null }));
    Ok(())
}
