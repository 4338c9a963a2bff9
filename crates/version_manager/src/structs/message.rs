use chrono::Utc;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::structs::version::MessageVersion;

/// A unit of conversation turn.
///
/// The version fields (`versions`, `current_version_index`,
/// `parent_message_id`) are absent on messages persisted before versioning
/// existed; such records are carried as-is and upgraded by the store's
/// migration pass.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Absent only on legacy or malformed records. A message without an id
    /// cannot be addressed and never appears in the active path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub role: Role,

    /// Ordered content blocks, opaque to the version model. Always mirrors
    /// `versions[current_version_index].content` once the message has been
    /// edited.
    #[serde(default)]
    pub content: Vec<ContentPart>,

    /// Creation timestamp, seconds since epoch.
    #[serde(default)]
    pub created: i64,

    /// Rendering visibility. `Unset` renders as visible and is omitted on
    /// the wire, preserving the legacy optional-boolean encoding.
    #[serde(default, skip_serializing_if = "Visibility::is_unset")]
    pub display: Visibility,

    /// Edit history; insertion order is chronological edit order. Absent or
    /// length <= 1 means the message was never edited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<MessageVersion>>,

    /// Zero-based index of the version whose content is mirrored into
    /// `content`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version_index: Option<usize>,

    /// Back-reference to an ancestor message. Relation only; visibility is
    /// driven by the version-owned child sets, not by this field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: Vec<ContentPart>) -> Self {
        Self {
            id: Some(Uuid::new_v4().to_string()),
            role,
            content,
            created: Utc::now().timestamp(),
            display: Visibility::Unset,
            versions: None,
            current_version_index: None,
            parent_message_id: None,
        }
    }

    /// Create a user message with a single text block
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentPart::text(text)])
    }

    /// Create an assistant message with a single text block
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![ContentPart::text(text)])
    }

    pub fn is_visible(&self) -> bool {
        self.display.is_visible()
    }

    /// All text content concatenated
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| part.text_content())
            .collect::<Vec<_>>()
            .join("")
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// A part of message content (text, tool call, tool response, image).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    ToolCall {
        id: String,
        name: String,
        arguments: serde_json::Value,
    },
    ToolResponse {
        id: String,
        result: serde_json::Value,
    },
    Image {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        alt_text: Option<String>,
    },
}

impl ContentPart {
    /// Create a text content part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Get text content if this is a text part
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Rendering visibility for a message.
///
/// Persisted documents carry this as an optional boolean (`display`), where
/// absence means visible. `Unset` keeps that distinction so a round-trip does
/// not invent a field the original document never had.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
    Unset,
}

impl Visibility {
    /// `Unset` defaults to visible; only an explicit `Hidden` suppresses.
    pub fn is_visible(self) -> bool {
        !matches!(self, Visibility::Hidden)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Visibility::Unset)
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Unset
    }
}

impl Serialize for Visibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Unset is skipped at the field level; if serialized anyway it
        // degrades to the visible default.
        serializer.serialize_bool(self.is_visible())
    }
}

impl<'de> Deserialize<'de> for Visibility {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let visible = bool::deserialize(deserializer)?;
        Ok(if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        })
    }
}
