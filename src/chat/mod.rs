//! The PROJ-BLE Education Assistant chat front-end.
//!
//! This module ties the library pieces into a chat application:
//!
//! - Streaming replies grown into a placeholder message as chunks arrive
//! - Static apologies in place of any failure, with input re-enabled
//! - A theme cycle and slash commands for session control
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`app`]: Chat state and the streaming dispatcher
//! - [`commands`]: Slash command parsing
//! - [`prompt`]: The assistant persona and fixed user-facing text

mod app;
mod commands;
mod config;
pub mod prompt;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use app::{ChatApp, SessionStats, Turn};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, ConfigFile};
