use serde::{Deserialize, Serialize};

use crate::types::Role;

/// One entry of the conversation log.
///
/// `content` is mutable so that a streamed response can be appended in place;
/// `timestamp` is a preformatted display string fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the message.
    pub role: Role,

    /// The raw message text, rendered by [`crate::markup::render`].
    pub content: String,

    /// Display timestamp, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Message {
    /// Create a new `Message`.
    pub fn new(role: Role, content: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp,
        }
    }

    /// Create a user message stamped with `timestamp`.
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::new(Role::User, content, Some(timestamp.into()))
    }

    /// Create a model message stamped with `timestamp`.
    pub fn model(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::new(Role::Model, content, Some(timestamp.into()))
    }

    /// Create the empty model message that a streamed response is written into.
    pub fn placeholder(timestamp: impl Into<String>) -> Self {
        Self::model(String::new(), timestamp)
    }

    /// Returns true if the model wrote this message.
    pub fn is_model(&self) -> bool {
        self.role == Role::Model
    }

    /// Returns true if the user wrote this message.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
