use serde::{Deserialize, Serialize};
use std::fmt;

/// Reasons why the model stopped generating a response.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model reached a natural stopping point or a stop sequence
    Stop,

    /// The response reached the maximum token limit
    Length,

    /// Content was omitted by the provider's content filter
    ContentFilter,

    /// The model called a tool
    ToolCalls,

    /// The model called a function (deprecated form of tool calls)
    FunctionCall,

    /// A reason this client does not know about
    #[serde(other)]
    Other,
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishReason::Stop => write!(f, "stop"),
            FinishReason::Length => write!(f, "length"),
            FinishReason::ContentFilter => write!(f, "content_filter"),
            FinishReason::ToolCalls => write!(f, "tool_calls"),
            FinishReason::FunctionCall => write!(f, "function_call"),
            FinishReason::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialization() {
        let reason: FinishReason = serde_json::from_str(r#""stop""#).unwrap();
        assert_eq!(reason, FinishReason::Stop);

        let reason: FinishReason = serde_json::from_str(r#""content_filter""#).unwrap();
        assert_eq!(reason, FinishReason::ContentFilter);
    }

    #[test]
    fn unknown_reason_is_tolerated() {
        let reason: FinishReason = serde_json::from_str(r#""eos""#).unwrap();
        assert_eq!(reason, FinishReason::Other);
    }

    #[test]
    fn display() {
        assert_eq!(FinishReason::Length.to_string(), "length");
        assert_eq!(FinishReason::ToolCalls.to_string(), "tool_calls");
    }
}
