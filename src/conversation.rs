//! The ordered conversation log.
//!
//! Messages are only ever appended.  The one exception is the last message,
//! whose content may be extended or replaced while a reply streams into it.

use crate::types::Message;

/// An append-mostly sequence of messages held for the life of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a conversation seeded with `message`.
    pub fn seeded(message: Message) -> Self {
        Self {
            messages: vec![message],
        }
    }

    /// Appends a message to the end of the log.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Appends `text` to the content of the last message.
    ///
    /// Returns false (and changes nothing) if the log is empty.  Earlier
    /// messages and the timestamp are never touched.
    pub fn append_to_last(&mut self, text: &str) -> bool {
        match self.messages.last_mut() {
            Some(last) => {
                last.content.push_str(text);
                true
            }
            None => false,
        }
    }

    /// Replaces the content of the last message, keeping its role and timestamp.
    pub fn replace_last_content(&mut self, content: impl Into<String>) -> bool {
        match self.messages.last_mut() {
            Some(last) => {
                last.content = content.into();
                true
            }
            None => false,
        }
    }

    /// The last message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// All messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Iterates over the messages in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
