use serde::{Deserialize, Serialize};

use crate::structs::message::Message;

/// The ordered conversation transcript.
///
/// This is the sole addressable collection of messages; versions and their
/// child-id sets are owned by their parent message and live and die with it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Transcript {
    pub messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Position of the first message carrying this id, in transcript order.
    pub fn position_of(&self, message_id: &str) -> Option<usize> {
        self.messages
            .iter()
            .position(|message| message.id.as_deref() == Some(message_id))
    }

    pub fn get(&self, message_id: &str) -> Option<&Message> {
        self.position_of(message_id)
            .map(|position| &self.messages[position])
    }
}
