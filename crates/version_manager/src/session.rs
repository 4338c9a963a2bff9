//! Session controller.
//!
//! Owns the transcript and the cached active path, and wires the callbacks
//! the presentation layer dispatches: editing a message, switching between
//! sibling versions, and recording arriving replies. Every mutation is
//! applied as a whole-transcript replacement and the active path is
//! recomputed before control returns, so a render never observes a stale
//! path.

use std::sync::Arc;

use crate::events::{TracingObserver, VersionEvent, VersionObserver};
use crate::path::BranchSelection;
use crate::structs::message::{ContentPart, Message};
use crate::structs::transcript::Transcript;

/// Result of an edit request.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// A new version was created; the caller should dispatch the request to
    /// the reply transport.
    Edited { regenerate: RegenerateRequest },
    /// Precondition not met (unknown id or unchanged content); nothing
    /// changed.
    Ignored,
}

/// Ask the (external) transport for a regenerated assistant reply keyed on
/// the edited content.
#[derive(Debug, Clone, PartialEq)]
pub struct RegenerateRequest {
    pub message_id: String,
    pub content: Vec<ContentPart>,
}

pub struct ChatSession {
    transcript: Transcript,
    active_path: Vec<String>,
    observer: Arc<dyn VersionObserver>,
}

impl ChatSession {
    pub fn new(transcript: Transcript) -> Self {
        Self::with_observer(transcript, Arc::new(TracingObserver))
    }

    pub fn with_observer(transcript: Transcript, observer: Arc<dyn VersionObserver>) -> Self {
        let active_path = transcript.compute_active_version_path(None, observer.as_ref());
        Self {
            transcript,
            active_path,
            observer,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The ordered ids the presentation layer should mount.
    pub fn active_path(&self) -> &[String] {
        &self.active_path
    }

    /// Append a message and refresh the path.
    pub fn push_message(&mut self, message: Message) {
        let mut next = self.transcript.clone();
        next.push(message);
        self.active_path = next.compute_active_version_path(None, self.observer.as_ref());
        self.transcript = next;
    }

    /// Append a reply, linking it into the parent's active version child set
    /// and recording the parent relation on the reply itself.
    pub fn record_reply(&mut self, parent_message_id: &str, mut reply: Message) {
        reply.parent_message_id = Some(parent_message_id.to_string());
        let reply_id = reply.id.clone();

        let mut next = self.transcript.clone();
        if let (Some(position), Some(reply_id)) = (next.position_of(parent_message_id), reply_id) {
            let parent = &mut next.messages[position];
            if let Some(versions) = parent.versions.as_mut() {
                if !versions.is_empty() {
                    let active = parent
                        .current_version_index
                        .unwrap_or(versions.len() - 1)
                        .min(versions.len() - 1);
                    versions[active].child_message_ids.push(reply_id);
                }
            }
        }
        next.push(reply);

        self.active_path = next.compute_active_version_path(None, self.observer.as_ref());
        self.transcript = next;
    }

    /// Commit an edit: capture current descendants, preserve the superseded
    /// content as a version, hide the descendants, and recompute the path.
    ///
    /// An unknown id or content identical to the current content is a silent
    /// no-op: no version is created and no regeneration request is produced.
    pub fn edit_message(&mut self, message_id: &str, new_content: Vec<ContentPart>) -> EditOutcome {
        let Some(position) = self.transcript.position_of(message_id) else {
            return EditOutcome::Ignored;
        };
        let message = &self.transcript.messages[position];
        if message.content == new_content {
            return EditOutcome::Ignored;
        }

        let downstream = self.visible_downstream_ids(position);
        let edited = message.create_new_version(new_content.clone(), &downstream);
        let selected_version_index = edited.version_count() - 1;

        let mut next = self.transcript.clone();
        next.messages[position] = edited;
        let next = next.hide_downstream_messages(message_id);

        let selection = BranchSelection {
            edited_message_id: message_id.to_string(),
            selected_version_index,
        };
        self.active_path =
            next.compute_active_version_path(Some(&selection), self.observer.as_ref());
        self.transcript = next;

        self.observer.on_event(&VersionEvent::VersionCreated {
            message_id: message_id.to_string(),
            version_number: selected_version_index as u32 + 1,
        });
        self.observer.on_event(&VersionEvent::RegenerationRequested {
            message_id: message_id.to_string(),
        });

        EditOutcome::Edited {
            regenerate: RegenerateRequest {
                message_id: message_id.to_string(),
                content: new_content,
            },
        }
    }

    /// Switch a message to one of its sibling versions, restore the replies
    /// that belonged to it, and recompute the path. Invalid input leaves the
    /// transcript and rendering exactly as before, with a diagnostic.
    pub fn switch_message_version(&mut self, message_id: &str, version_index: usize) {
        let Some(position) = self.transcript.position_of(message_id) else {
            self.observer.on_event(&VersionEvent::RestoreTargetMissing {
                message_id: message_id.to_string(),
            });
            return;
        };

        let message = &self.transcript.messages[position];
        let available = message.version_count();
        if version_index >= available {
            self.observer.on_event(&VersionEvent::SwitchIgnored {
                message_id: message_id.to_string(),
                requested: version_index,
                available,
            });
            return;
        }

        let switched = message.switch_version(version_index);
        let mut next = self.transcript.clone();
        next.messages[position] = switched;
        let next =
            next.restore_messages_for_version(message_id, version_index, self.observer.as_ref());

        let selection = BranchSelection {
            edited_message_id: message_id.to_string(),
            selected_version_index: version_index,
        };
        self.active_path =
            next.compute_active_version_path(Some(&selection), self.observer.as_ref());
        self.transcript = next;

        self.observer.on_event(&VersionEvent::VersionSwitched {
            message_id: message_id.to_string(),
            version_index,
        });
    }

    /// 1-based (current, total) version position for the navigator control,
    /// or `None` for a message with no recorded history.
    pub fn version_position(&self, message_id: &str) -> Option<(u32, u32)> {
        let message = self.transcript.get(message_id)?;
        let versions = message.versions.as_ref()?;
        if versions.is_empty() {
            return None;
        }
        let current = message
            .current_version_index
            .unwrap_or(versions.len() - 1)
            .min(versions.len() - 1);
        Some((current as u32 + 1, versions.len() as u32))
    }

    /// Ids of the visible messages after `position`, in transcript order.
    /// Hidden later messages belong to sibling versions of some edited
    /// message and are not captured.
    fn visible_downstream_ids(&self, position: usize) -> Vec<String> {
        self.transcript.messages[position + 1..]
            .iter()
            .filter(|message| message.is_visible())
            .filter_map(|message| message.id.clone())
            .collect()
    }
}

/// Label for the version navigator affordance.
pub fn version_navigator_text(current: u32, total: u32) -> String {
    format!("< {current} / {total} >")
}
