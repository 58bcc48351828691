use std::fmt;

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the conversation.
    System,

    /// The person at the keyboard.
    User,

    /// The model.
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single entry in the conversation history sent to the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// The role of the message.
    pub role: Role,

    /// The text of the message.
    pub content: String,
}

impl ChatMessage {
    /// Create a new `ChatMessage` with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

impl From<&str> for ChatMessage {
    fn from(content: &str) -> Self {
        Self::user(content)
    }
}

impl From<String> for ChatMessage {
    fn from(content: String) -> Self {
        Self::user(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn message_serialization() {
        let message = ChatMessage::user("Hello!");
        assert_eq!(
            to_value(&message).unwrap(),
            json!({"role": "user", "content": "Hello!"})
        );

        let message = ChatMessage::assistant("Hi there.");
        assert_eq!(
            to_value(&message).unwrap(),
            json!({"role": "assistant", "content": "Hi there."})
        );
    }

    #[test]
    fn message_deserialization() {
        let message: ChatMessage =
            serde_json::from_value(json!({"role": "system", "content": "Be brief."})).unwrap();
        assert_eq!(message, ChatMessage::system("Be brief."));
    }

    #[test]
    fn from_str_is_user() {
        let message = ChatMessage::from("question");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.content, "question");
    }
}
