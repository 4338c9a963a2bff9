//! Version operations.
//!
//! All operations here follow a functional update discipline: inputs are
//! never mutated, a new value is returned, and concurrent readers of a prior
//! snapshot stay valid. Invalid input degrades to a no-op, never a panic.

use chrono::Utc;
use std::collections::HashSet;

use crate::events::{VersionEvent, VersionObserver};
use crate::structs::message::{ContentPart, Message, Visibility};
use crate::structs::transcript::Transcript;
use crate::structs::version::MessageVersion;

impl Message {
    /// Append a new version holding `new_content` and make it active.
    ///
    /// On the first edit, the pre-edit content is preserved as version 1 with
    /// `downstream_ids` as its child set. On later edits the captured
    /// `downstream_ids` are written into the previously active version, so
    /// switching back restores exactly the replies that belonged to it.
    /// Version numbers stay contiguous 1-based regardless of how many edits
    /// occurred.
    pub fn create_new_version(
        &self,
        new_content: Vec<ContentPart>,
        downstream_ids: &[String],
    ) -> Message {
        let mut updated = self.clone();

        let mut versions = match updated.versions.take() {
            Some(mut versions) if !versions.is_empty() => {
                let active = updated
                    .current_version_index
                    .unwrap_or(versions.len() - 1)
                    .min(versions.len() - 1);
                versions[active].child_message_ids = downstream_ids.to_vec();
                versions
            }
            _ => vec![MessageVersion::initial(
                updated.content.clone(),
                updated.created,
                downstream_ids.to_vec(),
            )],
        };

        versions.push(MessageVersion {
            version_number: versions.len() as u32 + 1,
            content: new_content.clone(),
            timestamp: Utc::now().timestamp(),
            child_message_ids: Vec::new(),
        });

        updated.current_version_index = Some(versions.len() - 1);
        updated.versions = Some(versions);
        updated.content = new_content;
        updated
    }

    /// Make `versions[version_index]` the active version, mirroring its
    /// content. An out-of-range index (or a message with no history) returns
    /// the message unchanged.
    pub fn switch_version(&self, version_index: usize) -> Message {
        let Some(version) = self
            .versions
            .as_ref()
            .and_then(|versions| versions.get(version_index))
        else {
            return self.clone();
        };

        let mut updated = self.clone();
        updated.content = version.content.clone();
        updated.current_version_index = Some(version_index);
        updated
    }

    /// True iff the message has been edited at least once.
    pub fn has_multiple_versions(&self) -> bool {
        self.version_count() > 1
    }

    pub fn version_count(&self) -> usize {
        self.versions.as_ref().map_or(0, Vec::len)
    }
}

impl Transcript {
    /// Mark every message after the edited one as hidden. Messages at or
    /// before the edited position are untouched. Unknown id is a no-op.
    pub fn hide_downstream_messages(&self, edited_message_id: &str) -> Transcript {
        let Some(position) = self.position_of(edited_message_id) else {
            return self.clone();
        };

        let messages = self
            .messages
            .iter()
            .enumerate()
            .map(|(index, message)| {
                if index > position {
                    let mut hidden = message.clone();
                    hidden.display = Visibility::Hidden;
                    hidden
                } else {
                    message.clone()
                }
            })
            .collect();

        Transcript { messages }
    }

    /// Rewrite the display flags after the edited message so that exactly the
    /// members of `versions[version_index].child_message_ids` are visible.
    ///
    /// Idempotent: a second application with the same arguments yields the
    /// same flags. Unknown id or an out-of-range index reports through the
    /// observer and returns the transcript unchanged.
    pub fn restore_messages_for_version(
        &self,
        message_id: &str,
        version_index: usize,
        observer: &dyn VersionObserver,
    ) -> Transcript {
        let Some(position) = self.position_of(message_id) else {
            observer.on_event(&VersionEvent::RestoreTargetMissing {
                message_id: message_id.to_string(),
            });
            return self.clone();
        };

        let target = &self.messages[position];
        let Some(version) = target
            .versions
            .as_ref()
            .and_then(|versions| versions.get(version_index))
        else {
            observer.on_event(&VersionEvent::InvalidVersionIndex {
                message_id: message_id.to_string(),
                requested: version_index,
                available: target.version_count(),
            });
            return self.clone();
        };

        let members: HashSet<&str> = version
            .child_message_ids
            .iter()
            .map(String::as_str)
            .collect();

        let messages = self
            .messages
            .iter()
            .enumerate()
            .map(|(index, message)| {
                if index <= position {
                    return message.clone();
                }
                let mut updated = message.clone();
                let is_member = message
                    .id
                    .as_deref()
                    .is_some_and(|id| members.contains(id));
                updated.display = if is_member {
                    Visibility::Visible
                } else {
                    Visibility::Hidden
                };
                updated
            })
            .collect();

        Transcript { messages }
    }

    /// Ids of the downstream replies owned by `versions[version_index]` of
    /// the given message. The version-owned child set is the authoritative
    /// linkage; `parent_message_id` is a reserved relation and never
    /// consulted here. Empty when the message or index does not resolve.
    pub fn child_message_ids(&self, message_id: &str, version_index: usize) -> Vec<String> {
        self.get(message_id)
            .and_then(|message| message.versions.as_ref())
            .and_then(|versions| versions.get(version_index))
            .map(|version| version.child_message_ids.clone())
            .unwrap_or_default()
    }
}
