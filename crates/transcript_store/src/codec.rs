//! JSON codec and legacy migration.
//!
//! Serialization is a lossless structural encoding of the full object graph.
//! Deserialization goes through the untrusted shapes in [`crate::raw`] and
//! normalizes each version record field-by-field instead of rejecting
//! malformed entries; the only hard failure is text that is not valid JSON.

use chrono::Utc;

use crate::error::Result;
use crate::raw::{RawMessage, RawTranscript, RawVersion};
use version_manager::{Message, MessageVersion, Transcript, VersionEvent, VersionObserver};

pub fn serialize_transcript(transcript: &Transcript) -> Result<String> {
    Ok(serde_json::to_string_pretty(transcript)?)
}

pub fn serialize_message(message: &Message) -> Result<String> {
    Ok(serde_json::to_string_pretty(message)?)
}

pub fn deserialize_transcript(text: &str, observer: &dyn VersionObserver) -> Result<Transcript> {
    let raw: RawTranscript = serde_json::from_str(text)?;
    let messages = raw
        .messages
        .into_iter()
        .map(|message| normalize_message(message, observer))
        .collect();
    Ok(Transcript::from_messages(messages))
}

pub fn deserialize_message(text: &str, observer: &dyn VersionObserver) -> Result<Message> {
    let raw: RawMessage = serde_json::from_str(text)?;
    Ok(normalize_message(raw, observer))
}

/// True iff the message carries any version-history field. Legacy messages
/// persisted before versioning have none of them.
pub fn has_version_data(message: &Message) -> bool {
    message.versions.is_some()
        || message.current_version_index.is_some()
        || message.parent_message_id.is_some()
}

/// Upgrade a legacy message by synthesizing its initial version from the
/// current content. Idempotent, and every pre-existing field is preserved
/// exactly.
pub fn migrate_legacy_message(message: Message) -> Message {
    if has_version_data(&message) {
        return message;
    }
    let initial = MessageVersion::initial(message.content.clone(), message.created, Vec::new());
    Message {
        versions: Some(vec![initial]),
        current_version_index: Some(0),
        ..message
    }
}

fn normalize_message(raw: RawMessage, observer: &dyn VersionObserver) -> Message {
    let message_id = raw.id.clone();
    let versions = raw.versions.map(|versions| {
        versions
            .into_iter()
            .map(|version| normalize_version(version, message_id.as_deref(), observer))
            .collect::<Vec<_>>()
    });

    if let (Some(versions), Some(index)) = (versions.as_ref(), raw.current_version_index) {
        if index >= versions.len() {
            tracing::warn!(
                message_id = ?message_id,
                index,
                version_count = versions.len(),
                "currentVersionIndex out of range in persisted message"
            );
        }
    }

    Message {
        id: raw.id,
        role: raw.role,
        content: raw.content,
        created: raw.created,
        display: raw.display,
        versions,
        current_version_index: raw.current_version_index,
        parent_message_id: raw.parent_message_id,
    }
}

fn normalize_version(
    raw: RawVersion,
    message_id: Option<&str>,
    observer: &dyn VersionObserver,
) -> MessageVersion {
    let mut defaulted = Vec::new();
    if raw.version_number.is_none() {
        defaulted.push("versionNumber".to_string());
    }
    if raw.content.is_none() {
        defaulted.push("content".to_string());
    }
    if raw.timestamp.is_none() {
        defaulted.push("timestamp".to_string());
    }
    if raw.child_message_ids.is_none() {
        defaulted.push("childMessageIds".to_string());
    }

    let version = MessageVersion {
        version_number: raw.version_number.unwrap_or(1),
        content: raw.content.unwrap_or_default(),
        timestamp: raw.timestamp.unwrap_or_else(|| Utc::now().timestamp()),
        child_message_ids: raw.child_message_ids.unwrap_or_default(),
    };

    if !defaulted.is_empty() {
        observer.on_event(&VersionEvent::VersionRecordNormalized {
            message_id: message_id.map(str::to_string),
            defaulted_fields: defaulted,
        });
    }

    version
}
