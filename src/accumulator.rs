//! Accumulates streamed chunks into a complete response while reporting
//! what changed with each chunk.
//!
//! The session feeds every [`ChatCompletionChunk`] through
//! [`ChatCompletionAccumulator::add_chunk`] and renders the returned
//! [`StreamUpdate`]s; once the stream is drained,
//! [`ChatCompletionAccumulator::response`] holds the full answer and usage.

use crate::types::{ChatCompletionChunk, CompletionUsage, FinishReason};

/// Something the renderer should react to after a chunk was accumulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    /// A new fragment of answer text.
    ContentDelta(String),
    /// A new fragment of a refusal.
    RefusalDelta(String),
    /// The answer text is complete.
    ContentFinished,
    /// The refusal is complete; carries the whole refusal text.
    RefusalFinished(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Segment {
    Content,
    Refusal,
}

/// The final state of a streamed completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccumulatedResponse {
    /// Server-assigned identifier.
    pub id: String,
    /// Model that produced the completion.
    pub model: String,
    /// Full answer text.
    pub content: String,
    /// Full refusal text, if the model refused.
    pub refusal: Option<String>,
    /// Why generation stopped, when the server said so.
    pub finish_reason: Option<FinishReason>,
    /// Token usage, when the server reported it.
    pub usage: Option<CompletionUsage>,
}

/// Builds a response out of streamed chunks for choice 0.
#[derive(Debug, Clone, Default)]
pub struct ChatCompletionAccumulator {
    response: AccumulatedResponse,
    refusal: String,
    active: Option<Segment>,
}

impl ChatCompletionAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one chunk into the response and returns what changed, in order.
    pub fn add_chunk(&mut self, chunk: &ChatCompletionChunk) -> Vec<StreamUpdate> {
        let mut updates = Vec::new();

        if self.response.id.is_empty() && !chunk.id.is_empty() {
            self.response.id = chunk.id.clone();
        }
        if self.response.model.is_empty() && !chunk.model.is_empty() {
            self.response.model = chunk.model.clone();
        }
        if let Some(usage) = chunk.usage {
            self.response.usage = Some(usage);
        }

        let Some(choice) = chunk.first_choice() else {
            return updates;
        };

        if let Some(content) = choice.delta.content.as_deref().filter(|c| !c.is_empty()) {
            self.enter(Segment::Content, &mut updates);
            self.response.content.push_str(content);
            updates.push(StreamUpdate::ContentDelta(content.to_string()));
        }
        if let Some(refusal) = choice.delta.refusal.as_deref().filter(|r| !r.is_empty()) {
            self.enter(Segment::Refusal, &mut updates);
            self.refusal.push_str(refusal);
            updates.push(StreamUpdate::RefusalDelta(refusal.to_string()));
        }
        if let Some(reason) = choice.finish_reason {
            self.response.finish_reason = Some(reason);
            self.close(&mut updates);
        }

        updates
    }

    /// Closes whatever segment is still open when the stream ends.
    pub fn finish(&mut self) -> Vec<StreamUpdate> {
        let mut updates = Vec::new();
        self.close(&mut updates);
        updates
    }

    /// The text accumulated so far.
    pub fn content(&self) -> &str {
        &self.response.content
    }

    /// The response accumulated so far.
    pub fn response(&self) -> AccumulatedResponse {
        let mut response = self.response.clone();
        if !self.refusal.is_empty() {
            response.refusal = Some(self.refusal.clone());
        }
        response
    }

    fn enter(&mut self, segment: Segment, updates: &mut Vec<StreamUpdate>) {
        if self.active != Some(segment) {
            self.close(updates);
            self.active = Some(segment);
        }
    }

    fn close(&mut self, updates: &mut Vec<StreamUpdate>) {
        match self.active.take() {
            Some(Segment::Content) => updates.push(StreamUpdate::ContentFinished),
            Some(Segment::Refusal) => {
                updates.push(StreamUpdate::RefusalFinished(self.refusal.clone()))
            }
            None => {}
        }
    }
}
