use serde::{Deserialize, Serialize};

use crate::types::{CompletionUsage, FinishReason, Role};

/// The assistant message inside a non-streaming completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseMessage {
    /// Always `assistant` in practice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// The generated text, absent when the model refused.
    #[serde(default)]
    pub content: Option<String>,

    /// The refusal message, when the model declined to answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
}

/// One alternative answer in a completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Choice {
    /// Position of the choice in the response.
    #[serde(default)]
    pub index: u32,

    /// The generated message.
    pub message: ResponseMessage,

    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// A complete, non-streaming chat completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatCompletion {
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: String,

    /// Model that produced the completion, as reported by the server.
    #[serde(default)]
    pub model: String,

    /// The generated alternatives; vtwo only ever asks for one.
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Token usage for this completion.
    #[serde(default)]
    pub usage: Option<CompletionUsage>,
}

impl ChatCompletion {
    /// Text of the first choice, or the empty string when there is none.
    pub fn text(&self) -> &str {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or("")
    }

    /// Refusal of the first choice, if the model refused.
    pub fn refusal(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.refusal.as_deref())
    }
}
