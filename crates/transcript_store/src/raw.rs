//! Untrusted wire shapes.
//!
//! Everything that arrives as text deserializes into these first; the typed
//! model in `version_manager` is only constructed through the normalization
//! in [`crate::codec`]. Every version field is optional here so a partial
//! record parses instead of rejecting the whole document.

use serde::Deserialize;
use version_manager::{ContentPart, Role, Visibility};

#[derive(Deserialize, Debug)]
#[serde(transparent)]
pub(crate) struct RawTranscript {
    pub messages: Vec<RawMessage>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawMessage {
    pub id: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub content: Vec<ContentPart>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub display: Visibility,
    pub versions: Option<Vec<RawVersion>>,
    pub current_version_index: Option<usize>,
    pub parent_message_id: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawVersion {
    pub version_number: Option<u32>,
    pub content: Option<Vec<ContentPart>>,
    pub timestamp: Option<i64>,
    pub child_message_ids: Option<Vec<String>>,
}
