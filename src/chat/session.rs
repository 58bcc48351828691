//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which manages conversation
//! state, streams answers through a [`Renderer`], and keeps track of what the
//! session has cost so far.

use futures::StreamExt;

use crate::accumulator::{ChatCompletionAccumulator, StreamUpdate};
use crate::chat::config::ChatConfig;
use crate::client::Client;
use crate::cost::CostTracker;
use crate::error::Result;
use crate::observability::STREAM_INTERRUPTS;
use crate::render::Renderer;
use crate::types::{ChatCompletionParams, ChatMessage, CompletionUsage, Model};

/// A chat session that manages conversation state and API interactions.
///
/// History only ever holds complete exchanges: a user message is kept only
/// once its answer (possibly interrupted) has been appended after it.
pub struct ChatSession {
    client: Client,
    config: ChatConfig,
    messages: Vec<ChatMessage>,
    cost: CostTracker,
    last_turn_usage: Option<CompletionUsage>,
    request_count: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    /// The model used for the session.
    pub model: Model,
    /// The number of messages in the conversation.
    pub message_count: usize,
    /// Total prompt tokens across all requests.
    pub total_prompt_tokens: u64,
    /// Total completion tokens across all requests.
    pub total_completion_tokens: u64,
    /// Total number of API requests made.
    pub total_requests: u64,
    /// Usage of the last answered request, if the server reported it.
    pub last_turn_usage: Option<CompletionUsage>,
    /// Dollar cost of the session so far.
    pub cost: f64,
}

impl ChatSession {
    /// Creates a new chat session with the given client and configuration.
    pub fn new(client: Client, config: ChatConfig) -> Self {
        let cost = CostTracker::for_model(&config.model, config.output_cost_ratio);
        Self {
            client,
            config,
            messages: Vec::new(),
            cost,
            last_turn_usage: None,
            request_count: 0,
        }
    }

    /// Creates a client from `config` and a session around it.
    pub fn from_config(config: ChatConfig) -> Result<Self> {
        let client = Client::with_options(
            config.api_key.clone(),
            config.base_url.as_deref(),
            Some(config.timeout),
        )?;
        Ok(Self::new(client, config))
    }

    /// Sends a user message and streams the response.
    ///
    /// This method:
    /// 1. Adds the user message to history
    /// 2. Sends a streaming request to the API
    /// 3. Renders response fragments as they arrive
    /// 4. Records token usage and adds the answer to history
    ///
    /// When the renderer asks for an interrupt the stream is abandoned and the
    /// partial answer is kept. Usage only arrives in the trailing chunk, so an
    /// interrupted turn adds nothing to the session cost.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the stream fails; the user message
    /// is removed from history in that case.
    pub async fn send_streaming(
        &mut self,
        user_input: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<String> {
        let previous_len = self.messages.len();
        self.messages.push(ChatMessage::user(user_input));

        match self.stream_turn(renderer).await {
            Ok(reply) => {
                self.messages.push(ChatMessage::assistant(reply.clone()));
                Ok(reply)
            }
            Err(err) => {
                renderer.finish_response();
                self.messages.truncate(previous_len);
                Err(err)
            }
        }
    }

    /// Sends a user message and waits for the complete answer.
    ///
    /// History is updated exactly as in [`ChatSession::send_streaming`].
    pub async fn send(&mut self, user_input: &str) -> Result<String> {
        let previous_len = self.messages.len();
        self.messages.push(ChatMessage::user(user_input));

        let params = ChatCompletionParams::new(self.config.model.clone(), self.messages.clone());
        self.request_count = self.request_count.saturating_add(1);
        match self.client.send(params).await {
            Ok(completion) => {
                if let Some(usage) = completion.usage {
                    self.record_usage(usage);
                }
                let reply = completion.text().to_string();
                self.messages.push(ChatMessage::assistant(reply.clone()));
                Ok(reply)
            }
            Err(err) => {
                self.messages.truncate(previous_len);
                Err(err)
            }
        }
    }

    async fn stream_turn(&mut self, renderer: &mut dyn Renderer) -> Result<String> {
        let params =
            ChatCompletionParams::new_streaming(self.config.model.clone(), self.messages.clone());
        self.request_count = self.request_count.saturating_add(1);
        let mut stream = self.client.stream(params).await?;

        let mut accumulator = ChatCompletionAccumulator::new();
        let mut interrupted = false;
        renderer.start_response();
        while let Some(chunk) = stream.next().await {
            if renderer.should_interrupt() {
                interrupted = true;
                break;
            }
            for update in accumulator.add_chunk(&chunk?) {
                render_update(renderer, update);
            }
        }

        if interrupted {
            tracing::debug!("stream interrupted by user");
            STREAM_INTERRUPTS.click();
            renderer.print_interrupted();
        } else {
            for update in accumulator.finish() {
                render_update(renderer, update);
            }
        }
        renderer.finish_response();

        let response = accumulator.response();
        if let Some(usage) = response.usage {
            self.record_usage(usage);
        }
        Ok(response.content)
    }

    /// Clears the conversation history.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Removes the last user message and its answer.
    ///
    /// Returns false, leaving history untouched, when there is no complete
    /// exchange to remove.
    pub fn undo(&mut self) -> bool {
        if self.messages.len() < 2 {
            return false;
        }
        self.messages.truncate(self.messages.len() - 2);
        true
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns the conversation history.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the current model.
    pub fn model(&self) -> &Model {
        &self.config.model
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Dollar cost of the session so far.
    pub fn cost(&self) -> f64 {
        self.cost.cost()
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.config.model.clone(),
            message_count: self.message_count(),
            total_prompt_tokens: self.cost.prompt_tokens(),
            total_completion_tokens: self.cost.completion_tokens(),
            total_requests: self.request_count,
            last_turn_usage: self.last_turn_usage,
            cost: self.cost.cost(),
        }
    }

    fn record_usage(&mut self, usage: CompletionUsage) {
        tracing::debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "recorded usage"
        );
        self.last_turn_usage = Some(usage);
        self.cost.record(&usage);
    }
}

fn render_update(renderer: &mut dyn Renderer, update: StreamUpdate) {
    match update {
        StreamUpdate::ContentDelta(text) => renderer.print_text(&text),
        StreamUpdate::ContentFinished => renderer.finish_content(),
        StreamUpdate::RefusalDelta(_) => {}
        StreamUpdate::RefusalFinished(refusal) => renderer.print_refusal(&refusal),
    }
}
