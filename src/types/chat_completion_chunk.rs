use serde::{Deserialize, Serialize};

use crate::types::{CompletionUsage, FinishReason, Role};

/// The incremental part of a streamed choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkDelta {
    /// Present on the first chunk of a choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Next fragment of the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Next fragment of a refusal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
}

/// One choice inside a streamed chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkChoice {
    /// Which choice this delta belongs to.
    #[serde(default)]
    pub index: u32,

    /// The new fragment.
    #[serde(default)]
    pub delta: ChunkDelta,

    /// Set on the last chunk of the choice.
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// A single server-sent event of a streaming chat completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatCompletionChunk {
    /// Server-assigned identifier, shared by every chunk of one completion.
    #[serde(default)]
    pub id: String,

    /// Model that produced the completion.
    #[serde(default)]
    pub model: String,

    /// Deltas; empty on the trailing usage chunk.
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,

    /// Only present on the trailing chunk when usage was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<CompletionUsage>,
}

impl ChatCompletionChunk {
    /// A chunk carrying one content fragment for choice 0.
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ChunkChoice {
                delta: ChunkDelta {
                    content: Some(text.into()),
                    ..ChunkDelta::default()
                },
                ..ChunkChoice::default()
            }],
            ..Self::default()
        }
    }

    /// A chunk carrying one refusal fragment for choice 0.
    pub fn refusal(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ChunkChoice {
                delta: ChunkDelta {
                    refusal: Some(text.into()),
                    ..ChunkDelta::default()
                },
                ..ChunkChoice::default()
            }],
            ..Self::default()
        }
    }

    /// A chunk that closes choice 0 with the given reason.
    pub fn finished(reason: FinishReason) -> Self {
        Self {
            choices: vec![ChunkChoice {
                finish_reason: Some(reason),
                ..ChunkChoice::default()
            }],
            ..Self::default()
        }
    }

    /// The trailing usage-only chunk.
    pub fn usage(usage: CompletionUsage) -> Self {
        Self {
            usage: Some(usage),
            ..Self::default()
        }
    }

    /// The choice with index 0, if this chunk carries one.
    pub fn first_choice(&self) -> Option<&ChunkChoice> {
        self.choices.iter().find(|choice| choice.index == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_chunk_deserialization() {
        let json = json!({
            "id": "chatcmpl-1",
            "object": "chat.completion.chunk",
            "created": 1700000000,
            "model": "gpt-4o",
            "choices": [{"index": 0, "delta": {"content": "Hel"}, "finish_reason": null}]
        });

        let chunk: ChatCompletionChunk = serde_json::from_value(json).unwrap();
        assert_eq!(chunk.id, "chatcmpl-1");
        let choice = chunk.first_choice().unwrap();
        assert_eq!(choice.delta.content.as_deref(), Some("Hel"));
        assert_eq!(choice.finish_reason, None);
        assert!(chunk.usage.is_none());
    }

    #[test]
    fn usage_chunk_deserialization() {
        let json = json!({
            "id": "chatcmpl-1",
            "choices": [],
            "usage": {"prompt_tokens": 20, "completion_tokens": 7, "total_tokens": 27}
        });

        let chunk: ChatCompletionChunk = serde_json::from_value(json).unwrap();
        assert!(chunk.first_choice().is_none());
        assert_eq!(chunk.usage, Some(CompletionUsage::new(20, 7)));
    }

    #[test]
    fn first_choice_ignores_other_indices() {
        let mut chunk = ChatCompletionChunk::content("x");
        chunk.choices[0].index = 1;
        assert!(chunk.first_choice().is_none());
    }
}
