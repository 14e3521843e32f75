use serde::{Deserialize, Serialize};

/// One incremental piece of a streamed model response.
///
/// Only the text is guaranteed; anything else the service sends alongside it
/// is dropped before a chunk is built.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Chunk {
    /// The text carried by this chunk.  May be empty.
    pub text: String,
}

impl Chunk {
    /// Create a new `Chunk` with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Returns the number of bytes of text in this chunk.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if this chunk carries no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<&str> for Chunk {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Chunk {
    fn from(text: String) -> Self {
        Self { text }
    }
}
