// Public modules
pub mod chunk;
pub mod content;
pub mod generate_content_request;
pub mod generate_content_response;
pub mod message;
pub mod model;
pub mod role;

// Re-exports
pub use chunk::Chunk;
pub use content::{Content, Part};
pub use generate_content_request::GenerateContentRequest;
pub use generate_content_response::{
    Candidate, ErrorDetail, ErrorResponse, GenerateContentResponse,
};
pub use message::Message;
pub use model::{KnownModel, Model};
pub use role::Role;
