//! Core chat state and the streaming dispatcher.
//!
//! [`ChatApp`] owns the conversation, the loading flag, the theme cycle, and
//! the model session.  A send appends the user's message and an empty reply
//! placeholder, then grows the placeholder chunk by chunk as the reply
//! streams in.  Failures never escape: the placeholder is replaced with a
//! fixed apology and the error goes to the logger.

use std::fmt;
use std::sync::Arc;

use futures::StreamExt;

use super::prompt::{CONNECTION_ERROR_MESSAGE, SEND_ERROR_MESSAGE, WELCOME_MESSAGE};
use crate::client_logger::{ClientLogger, StderrLogger};
use crate::conversation::Conversation;
use crate::error::Result;
use crate::observability::{
    CHAT_SESSION_INIT_FAILURES, CHAT_SESSION_INITS, CHAT_SUBMITS_REJECTED, CHAT_TURN_FAILURES,
    CHAT_TURNS,
};
use crate::render::Renderer;
use crate::service::{ModelService, ModelSession};
use crate::theme::{Theme, ThemeCycle};
use crate::types::{Message, Model, Role};
use crate::utils::time::display_timestamp;

/// Marks a reply in flight for as long as it lives.
///
/// The loading flag is set on creation and cleared on drop, so every exit
/// from a turn re-enables input.
pub struct Turn<'a> {
    loading: &'a mut bool,
}

impl<'a> Turn<'a> {
    /// Sets `loading` and returns the guard that will clear it.
    pub fn begin(loading: &'a mut bool) -> Self {
        *loading = true;
        Self { loading }
    }
}

impl Drop for Turn<'_> {
    fn drop(&mut self) {
        *self.loading = false;
    }
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// The model used for the session.
    pub model: Model,
    /// The number of messages in the conversation.
    pub message_count: usize,
    /// Sends that reached the model.
    pub turns: u64,
    /// Turns that ended in the apology.
    pub failed_turns: u64,
    /// Name of the active theme.
    pub theme: String,
    /// Whether a model session is open.
    pub connected: bool,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model: {}", self.model)?;
        writeln!(f, "Connected: {}", if self.connected { "yes" } else { "no" })?;
        writeln!(f, "Messages: {}", self.message_count)?;
        writeln!(f, "Turns: {} ({} failed)", self.turns, self.failed_turns)?;
        write!(f, "Theme: {}", self.theme)
    }
}

/// The chat front-end state.
pub struct ChatApp {
    model: Model,
    conversation: Conversation,
    loading: bool,
    themes: ThemeCycle,
    session: Option<Box<dyn ModelSession>>,
    logger: Arc<dyn ClientLogger>,
    clock: fn() -> String,
    turns: u64,
    failed_turns: u64,
}

impl ChatApp {
    /// Creates an app with an empty conversation and no session.
    ///
    /// Call [`ChatApp::initialize`] or [`ChatApp::connect`] before sending.
    pub fn new(model: Model, themes: ThemeCycle) -> Self {
        Self {
            model,
            conversation: Conversation::new(),
            loading: false,
            themes,
            session: None,
            logger: Arc::new(StderrLogger::errors_only()),
            clock: display_timestamp,
            turns: 0,
            failed_turns: 0,
        }
    }

    /// Replaces the logger that receives swallowed failures.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Replaces the source of message timestamps.
    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    /// Opens a session on `service` and initializes with the outcome.
    pub fn connect<M>(&mut self, service: &M, system_instruction: &str)
    where
        M: ModelService,
        M::Session: 'static,
    {
        let session = service.open_session(&self.model, system_instruction);
        self.initialize(session);
    }

    /// Starts over from the outcome of opening a session.
    ///
    /// On success the session is kept and the conversation is seeded with the
    /// timestamped welcome.  On failure the error is logged, no session is
    /// kept, and the conversation is seeded with the connection apology; every
    /// later send is then a no-op.
    pub fn initialize<S>(&mut self, session: Result<S>)
    where
        S: ModelSession + 'static,
    {
        self.turns = 0;
        self.failed_turns = 0;
        match session {
            Ok(session) => {
                CHAT_SESSION_INITS.click();
                self.session = Some(Box::new(session));
                self.conversation = Conversation::seeded(Message::model(
                    WELCOME_MESSAGE,
                    (self.clock)(),
                ));
            }
            Err(err) => {
                CHAT_SESSION_INIT_FAILURES.click();
                self.logger.log_error("session initialization", &err);
                self.session = None;
                self.conversation = Conversation::seeded(Message::new(
                    Role::Model,
                    CONNECTION_ERROR_MESSAGE,
                    None,
                ));
            }
        }
    }

    /// Sends `text` and streams the reply into the conversation.
    ///
    /// Returns false without touching any state when the trimmed text is
    /// empty, a reply is already in flight, or there is no session.
    pub async fn send(&mut self, text: &str, renderer: &mut dyn Renderer) -> bool {
        let text = text.trim();
        if text.is_empty() || self.loading {
            CHAT_SUBMITS_REJECTED.click();
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            CHAT_SUBMITS_REJECTED.click();
            return false;
        };

        let _turn = Turn::begin(&mut self.loading);
        CHAT_TURNS.click();
        self.turns += 1;

        let timestamp = (self.clock)();
        self.conversation.push(Message::user(text, timestamp.clone()));
        let placeholder = Message::placeholder(timestamp);
        renderer.start_response(&placeholder);
        self.conversation.push(placeholder);

        let outcome = stream_reply(&mut **session, text, &mut self.conversation, renderer).await;
        renderer.finish_response();

        if let Err(err) = outcome {
            CHAT_TURN_FAILURES.click();
            self.failed_turns += 1;
            self.logger.log_error("send message", &err);
            self.conversation.replace_last_content(SEND_ERROR_MESSAGE);
            renderer.print_error(SEND_ERROR_MESSAGE);
        }
        true
    }

    /// Whether a reply is streaming.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a model session is open.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// The messages shown to the user, oldest first.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The configured model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The active theme.
    pub fn theme(&self) -> &Theme {
        self.themes.current()
    }

    /// The configured theme cycle.
    pub fn themes(&self) -> &ThemeCycle {
        &self.themes
    }

    /// Advances to the next theme and returns it.
    pub fn toggle_theme(&mut self) -> &Theme {
        self.themes.toggle()
    }

    /// Activates the named theme.  Returns false if the cycle has no such theme.
    pub fn select_theme(&mut self, name: &str) -> bool {
        self.themes.select(name)
    }

    /// Returns a snapshot of the session.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.model.clone(),
            message_count: self.conversation.len(),
            turns: self.turns,
            failed_turns: self.failed_turns,
            theme: self.themes.current().name().to_string(),
            connected: self.has_session(),
        }
    }
}

impl fmt::Debug for ChatApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatApp")
            .field("model", &self.model)
            .field("conversation", &self.conversation)
            .field("loading", &self.loading)
            .field("themes", &self.themes)
            .field("session", &self.session.is_some())
            .finish()
    }
}

async fn stream_reply(
    session: &mut dyn ModelSession,
    text: &str,
    conversation: &mut Conversation,
    renderer: &mut dyn Renderer,
) -> Result<()> {
    let mut chunks = session.send_streaming(text).await?;
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        conversation.append_to_last(&chunk.text);
        renderer.print_chunk(&chunk.text);
    }
    Ok(())
}
