use serde::{Deserialize, Serialize};

use crate::types::{Chunk, Content};

/// One candidate answer inside a streamed response payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Content produced so far for this candidate.
    #[serde(default)]
    pub content: Option<Content>,

    /// Why generation stopped; only present on the final payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// One `data:` payload of a `streamGenerateContent` stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate answers; the first one is the one displayed.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Model version that served the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Text carried by the first candidate, or the empty string.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(Content::text)
            .unwrap_or_default()
    }

    /// Reduce the payload to the typed chunk the dispatcher consumes.
    pub fn to_chunk(&self) -> Chunk {
        Chunk::new(self.text())
    }
}

/// Error object the service sends in place of a payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// HTTP-equivalent status code.
    #[serde(default)]
    pub code: Option<u16>,

    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,

    /// Canonical status name, such as `RESOURCE_EXHAUSTED`.
    #[serde(default)]
    pub status: Option<String>,
}

/// Envelope around an [`ErrorDetail`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The error.
    pub error: ErrorDetail,
}
