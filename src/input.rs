//! The message input box.
//!
//! [`InputController`] owns the text being composed.  Enter submits; Enter
//! with a modifier inserts a newline.  The controller is inert while a reply
//! is streaming.

/// What pressing Enter did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The buffer was submitted; carries the trimmed text.
    Submitted(String),
    /// A newline was inserted.
    Newline,
    /// Nothing happened.
    Ignored,
}

/// A single mutable text buffer with submit semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputController {
    buffer: String,
}

impl InputController {
    /// Creates an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// The text currently in the buffer.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Replaces the buffer.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Empties the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Returns true if the buffer has no non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    /// Takes the trimmed buffer for sending and clears it.
    ///
    /// Returns `None`, leaving the buffer alone, when it is blank or a reply
    /// is in flight.
    pub fn submit(&mut self, loading: bool) -> Option<String> {
        if loading || self.is_blank() {
            return None;
        }
        let text = self.buffer.trim().to_string();
        self.buffer.clear();
        Some(text)
    }

    /// Applies the line-break key.  `modifier` is true when shift or alt is
    /// held.
    pub fn handle_enter(&mut self, modifier: bool, loading: bool) -> KeyOutcome {
        if loading {
            return KeyOutcome::Ignored;
        }
        if modifier {
            self.buffer.push('\n');
            return KeyOutcome::Newline;
        }
        match self.submit(loading) {
            Some(text) => KeyOutcome::Submitted(text),
            None => KeyOutcome::Ignored,
        }
    }
}
