// Public modules
pub mod accumulator;
pub mod chat;
pub mod client;
pub mod cost;
pub mod error;
pub mod logging;
pub mod notes;
pub mod render;
pub mod sse;
pub mod types;

mod observability;

// Re-exports
pub use accumulator::{AccumulatedResponse, ChatCompletionAccumulator, StreamUpdate};
pub use client::{ChunkStream, Client};
pub use cost::{CostTracker, format_session_cost};
pub use error::{Error, Result};
pub use notes::{DailyNotes, NoteChunk};
pub use observability::register_biometrics;
pub use render::{EmphasisFilter, PlainTextRenderer, Renderer};
pub use types::*;
