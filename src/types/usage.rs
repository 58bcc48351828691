use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Token usage reported by the API for one completion.
///
/// Cost is billed per token, so this is all the session needs to keep a
/// running dollar total.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionUsage {
    /// Tokens in the prompt (the whole history sent with the request).
    #[serde(default)]
    pub prompt_tokens: u64,

    /// Tokens generated by the model.
    #[serde(default)]
    pub completion_tokens: u64,

    /// Sum of prompt and completion tokens.
    #[serde(default)]
    pub total_tokens: u64,
}

impl CompletionUsage {
    /// Create a new `CompletionUsage`; the total is derived.
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

impl Add for CompletionUsage {
    type Output = CompletionUsage;

    fn add(self, rhs: CompletionUsage) -> CompletionUsage {
        CompletionUsage {
            prompt_tokens: self.prompt_tokens.saturating_add(rhs.prompt_tokens),
            completion_tokens: self.completion_tokens.saturating_add(rhs.completion_tokens),
            total_tokens: self.total_tokens.saturating_add(rhs.total_tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn usage_deserialization() {
        let json = json!({
            "prompt_tokens": 50,
            "completion_tokens": 100,
            "total_tokens": 150,
            "prompt_tokens_details": {"cached_tokens": 0}
        });

        let usage: CompletionUsage = serde_json::from_value(json).unwrap();
        assert_eq!(usage, CompletionUsage::new(50, 100));
    }

    #[test]
    fn usage_addition() {
        let total = CompletionUsage::new(10, 5) + CompletionUsage::new(1, 2);
        assert_eq!(total, CompletionUsage::new(11, 7));
    }
}
