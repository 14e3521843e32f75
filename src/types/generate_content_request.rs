use serde::{Deserialize, Serialize};

use crate::types::Content;

/// Body of a `streamGenerateContent` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The fixed instruction the session was opened with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    /// Conversation so far, ending with the new user turn.
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Create a new request from prior turns.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            system_instruction: None,
            contents,
        }
    }

    /// Attach a system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::system(instruction));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use serde_json::{json, to_value};

    #[test]
    fn request_serialization() {
        let request = GenerateContentRequest::new(vec![Content::new(Role::User, "Hi")])
            .with_system_instruction("You are an assistant.");
        assert_eq!(
            to_value(&request).unwrap(),
            json!({
                "systemInstruction": {"parts": [{"text": "You are an assistant."}]},
                "contents": [{"role": "user", "parts": [{"text": "Hi"}]}]
            })
        );
    }
}
