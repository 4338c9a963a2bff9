//! `version_manager` is a crate for managing per-message edit history in a
//! chat transcript: creating and switching between content versions, hiding
//! the replies that belonged to a superseded version, and resolving which
//! subset of the transcript is currently visible.

// Declare the modules
pub mod events;
pub mod ops;
pub mod path;
pub mod session;
pub mod structs;

// Re-export the public API
pub use events::{
    CapturingObserver, FallbackReason, NullObserver, TracingObserver, VersionEvent,
    VersionObserver,
};
pub use path::BranchSelection;
pub use session::{ChatSession, EditOutcome, RegenerateRequest, version_navigator_text};
pub use structs::message::{ContentPart, Message, Role, Visibility};
pub use structs::transcript::Transcript;
pub use structs::version::MessageVersion;
