//! Active-path resolution.
//!
//! Given the transcript and an optional in-flight branch decision, computes
//! the ordered set of message ids that should be rendered. The resolver is
//! total over malformed input: inconsistencies omit the offending id or fall
//! back to the default path, with a diagnostic through the observer.

use crate::events::{FallbackReason, VersionEvent, VersionObserver};
use crate::structs::transcript::Transcript;

/// An edit or version-switch decision in flight, naming the message whose
/// version selection drives the branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchSelection {
    pub edited_message_id: String,
    pub selected_version_index: usize,
}

impl Transcript {
    /// Ordered ids of the messages that should be visible.
    ///
    /// With no selection, this is every message that has an id and is not
    /// hidden. With a selection, the path is the visible prefix up to and
    /// including the edited message, followed by the selected version's
    /// child ids in recorded order, deduplicated and filtered to ids that
    /// still resolve to visible messages.
    pub fn compute_active_version_path(
        &self,
        selection: Option<&BranchSelection>,
        observer: &dyn VersionObserver,
    ) -> Vec<String> {
        match selection {
            Some(selection) => self.branch_path(selection, observer),
            None => self.default_path(),
        }
    }

    fn default_path(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter(|message| message.is_visible())
            .filter_map(|message| message.id.clone())
            .collect()
    }

    fn branch_path(
        &self,
        selection: &BranchSelection,
        observer: &dyn VersionObserver,
    ) -> Vec<String> {
        let Some(position) = self.position_of(&selection.edited_message_id) else {
            observer.on_event(&VersionEvent::BranchFallback {
                edited_message_id: selection.edited_message_id.clone(),
                reason: FallbackReason::EditedMessageMissing,
            });
            return self.default_path();
        };

        let edited = &self.messages[position];
        let Some(version) = edited
            .versions
            .as_ref()
            .and_then(|versions| versions.get(selection.selected_version_index))
        else {
            observer.on_event(&VersionEvent::BranchFallback {
                edited_message_id: selection.edited_message_id.clone(),
                reason: FallbackReason::VersionIndexOutOfRange,
            });
            return self.default_path();
        };

        let mut path: Vec<String> = self.messages[..=position]
            .iter()
            .filter(|message| message.is_visible())
            .filter_map(|message| message.id.clone())
            .collect();

        for child_id in &version.child_message_ids {
            let Some(child) = self.get(child_id) else {
                observer.on_event(&VersionEvent::DanglingChildId {
                    parent_message_id: selection.edited_message_id.clone(),
                    child_message_id: child_id.clone(),
                });
                continue;
            };
            if !child.is_visible() {
                continue;
            }
            if path.iter().any(|id| id == child_id) {
                continue;
            }
            path.push(child_id.clone());
        }

        path
    }
}
