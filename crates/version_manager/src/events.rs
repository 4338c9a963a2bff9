use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Structured diagnostics emitted by version operations, the path resolver
/// and the session controller. Subscribers consume these to trace state
/// instead of scraping console output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VersionEvent {
    /// A new version was appended to a message's history.
    VersionCreated {
        message_id: String,
        version_number: u32,
    },

    /// The active version of a message changed.
    VersionSwitched {
        message_id: String,
        version_index: usize,
    },

    /// An edit committed; the transport layer should request a regenerated
    /// assistant reply for the new content.
    RegenerationRequested { message_id: String },

    /// A version switch named an index outside the message's history and was
    /// ignored.
    SwitchIgnored {
        message_id: String,
        requested: usize,
        available: usize,
    },

    /// A restore or switch named a message id that is not in the transcript.
    RestoreTargetMissing { message_id: String },

    /// A restore named a version index outside the target's history.
    InvalidVersionIndex {
        message_id: String,
        requested: usize,
        available: usize,
    },

    /// Branch-mode path resolution could not honor its inputs and degraded
    /// to the default path.
    BranchFallback {
        edited_message_id: String,
        reason: FallbackReason,
    },

    /// A version's child set referenced a message no longer in the
    /// transcript; the id was omitted from the path.
    DanglingChildId {
        parent_message_id: String,
        child_message_id: String,
    },

    /// A persisted version record was missing fields that were defaulted
    /// during deserialization.
    VersionRecordNormalized {
        #[serde(skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
        defaulted_fields: Vec<String>,
    },
}

/// Why branch-mode resolution fell back to the default path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    EditedMessageMissing,
    VersionIndexOutOfRange,
}

/// Sink for [`VersionEvent`]s. Injected wherever an operation can degrade
/// gracefully, so hosts decide whether diagnostics go to tracing, telemetry
/// or a test buffer.
pub trait VersionObserver: Send + Sync {
    fn on_event(&self, event: &VersionEvent);
}

/// Forwards events to `tracing`, warnings for degradations and debug for
/// routine notifications.
pub struct TracingObserver;

impl VersionObserver for TracingObserver {
    fn on_event(&self, event: &VersionEvent) {
        match event {
            VersionEvent::VersionCreated { .. }
            | VersionEvent::VersionSwitched { .. }
            | VersionEvent::RegenerationRequested { .. } => {
                tracing::debug!(event = ?event, "version event");
            }
            _ => {
                tracing::warn!(event = ?event, "version event");
            }
        }
    }
}

/// Discards all events.
pub struct NullObserver;

impl VersionObserver for NullObserver {
    fn on_event(&self, _event: &VersionEvent) {}
}

/// Buffers events for later inspection. Intended for tests asserting on the
/// diagnostics an operation produced.
#[derive(Default)]
pub struct CapturingObserver {
    events: Mutex<Vec<VersionEvent>>,
}

impl CapturingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<VersionEvent> {
        self.events.lock().expect("observer lock").clone()
    }
}

impl VersionObserver for CapturingObserver {
    fn on_event(&self, event: &VersionEvent) {
        self.events.lock().expect("observer lock").push(event.clone());
    }
}
