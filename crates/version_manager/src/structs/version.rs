use serde::{Deserialize, Serialize};

use crate::structs::message::ContentPart;

/// An immutable snapshot of a message's content at one point in its edit
/// history.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageVersion {
    /// 1-based sequence number, contiguous, equal to this version's 1-based
    /// position in the owning message's `versions` array.
    pub version_number: u32,

    /// The content this version held.
    pub content: Vec<ContentPart>,

    /// Creation time of this version, seconds since epoch.
    pub timestamp: i64,

    /// Ids of the downstream replies generated while this version was the
    /// active one. Exclusively owned by this version; a message id appears in
    /// at most one sibling version's set. Insertion order is display order.
    #[serde(default)]
    pub child_message_ids: Vec<String>,
}

impl MessageVersion {
    /// The synthesized first version of a message, capturing its pre-edit
    /// content and the replies that already existed.
    pub fn initial(content: Vec<ContentPart>, timestamp: i64, child_message_ids: Vec<String>) -> Self {
        Self {
            version_number: 1,
            content,
            timestamp,
            child_message_ids,
        }
    }
}
