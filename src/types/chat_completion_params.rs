use serde::{Deserialize, Serialize};

use crate::types::{ChatMessage, Model};

/// Options that only apply to streaming requests.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamOptions {
    /// Ask the server to send a final chunk carrying token usage.
    pub include_usage: bool,
}

/// Body of a `POST chat/completions` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionParams {
    /// The model that should answer.
    pub model: Model,

    /// The conversation so far, ending with the newest user message.
    pub messages: Vec<ChatMessage>,

    /// Whether the response is delivered as server-sent events.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,

    /// Streaming options; ignored by the server unless `stream` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,
}

impl ChatCompletionParams {
    /// Create a new non-streaming request.
    pub fn new(model: impl Into<Model>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: false,
            stream_options: None,
        }
    }

    /// Create a new streaming request that asks for a trailing usage chunk.
    pub fn new_streaming(model: impl Into<Model>, messages: Vec<ChatMessage>) -> Self {
        Self {
            stream: true,
            stream_options: Some(StreamOptions {
                include_usage: true,
            }),
            ..Self::new(model, messages)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;
    use serde_json::{json, to_value};

    #[test]
    fn non_streaming_omits_stream_fields() {
        let params = ChatCompletionParams::new(
            KnownModel::Gpt4oMini,
            vec![ChatMessage::user("Hello")],
        );
        assert_eq!(
            to_value(&params).unwrap(),
            json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "Hello"}]
            })
        );
    }

    #[test]
    fn streaming_requests_usage() {
        let params = ChatCompletionParams::new_streaming(
            "local-model",
            vec![ChatMessage::user("Hello")],
        );
        assert_eq!(
            to_value(&params).unwrap(),
            json!({
                "model": "local-model",
                "messages": [{"role": "user", "content": "Hello"}],
                "stream": true,
                "stream_options": {"include_usage": true}
            })
        );
    }
}
