//! Chat application module for interactive conversations.
//!
//! This module provides a streaming REPL chat interface built on top of the
//! vtwo client library. It supports:
//!
//! - Streaming responses with real-time token display
//! - ANSI bold rendering of `**emphasis**`
//! - Colon commands for session control
//! - Per-session cost tracking
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: configuration file and CLI argument parsing
//! - [`session`]: Core chat session management and API interaction
//! - [`commands`]: Colon command parsing

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{
    ApiConfig, ChatArgs, ChatConfig, DEFAULT_OUTPUT_COST_RATIO, DEFAULT_TIMEOUT_SECS,
    NotesConfig, UserConfig,
};
pub use session::{ChatSession, SessionStats};
