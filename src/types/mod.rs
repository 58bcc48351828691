// Public modules
pub mod chat_completion;
pub mod chat_completion_chunk;
pub mod chat_completion_params;
pub mod chat_message;
pub mod finish_reason;
pub mod model;
pub mod usage;

// Re-exports
pub use chat_completion::{ChatCompletion, Choice, ResponseMessage};
pub use chat_completion_chunk::{ChatCompletionChunk, ChunkChoice, ChunkDelta};
pub use chat_completion_params::{ChatCompletionParams, StreamOptions};
pub use chat_message::{ChatMessage, Role};
pub use finish_reason::FinishReason;
pub use model::{KnownModel, Model};
pub use usage::CompletionUsage;
