// Public modules
pub mod accumulating_stream;
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod conversation;
pub mod error;
pub mod input;
pub mod markup;
pub mod observability;
pub mod render;
pub mod service;
pub mod sse;
pub mod theme;
pub mod types;
pub mod utils;

// Re-exports
pub use client::{GeminiClient, GeminiSession};
pub use client_logger::{ClientLogger, StderrLogger};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use service::{ChunkStream, ModelService, ModelSession};
pub use types::*;
