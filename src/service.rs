//! The boundary between the chat front-end and the hosted model.
//!
//! A [`ModelService`] opens [`ModelSession`]s; a session sends one message at
//! a time and hands back a lazy, finite [`ChunkStream`].  The chat state only
//! ever talks to these traits, so it can be driven by the Gemini client or by
//! a scripted stand-in.

use std::pin::Pin;

use futures::Stream;

use crate::Result;
use crate::types::{Chunk, Model};

/// An ordered, non-restartable stream of response chunks.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Chunk>> + Send>>;

/// Something that can open chat sessions against a model.
pub trait ModelService {
    /// The session type this service hands out.
    type Session: ModelSession;

    /// Opens a session pre-seeded with `system_instruction`.
    fn open_session(&self, model: &Model, system_instruction: &str) -> Result<Self::Session>;
}

/// A stateful exchange with the model.
///
/// The session owns its conversational context; callers only supply the new
/// message text.
#[async_trait::async_trait]
pub trait ModelSession: Send {
    /// Sends `text` and returns the stream of the reply.
    async fn send_streaming(&mut self, text: &str) -> Result<ChunkStream>;
}
