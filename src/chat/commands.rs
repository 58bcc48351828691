//! Colon command parsing for the chat application.
//!
//! Any input line that starts with `:` is a command and is never sent to the
//! API. Commands match exactly; there are no arguments.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Exit the chat application.
    Quit,

    /// Clear the conversation history.
    Clear,

    /// Remove the last user message and its answer.
    Undo,

    /// Show the running session cost.
    Cost,

    /// Display help information.
    Help,

    /// Anything else starting with `:`; carries the input verbatim.
    Invalid(String),
}

/// Parses user input for colon commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use vtwo::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command(":q"), Some(ChatCommand::Quit));
/// assert!(parse_command("Hello there").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();
    if !input.starts_with(':') {
        return None;
    }

    let command = match input {
        ":q" | ":quit" => ChatCommand::Quit,
        ":c" | ":clear" => ChatCommand::Clear,
        ":u" | ":undo" => ChatCommand::Undo,
        ":cost" => ChatCommand::Cost,
        ":h" | ":help" => ChatCommand::Help,
        _ => ChatCommand::Invalid(input.to_string()),
    };
    Some(command)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  :q, :quit     Exit the chat
  :c, :clear    Clear conversation history
  :u, :undo     Remove the last question and answer
  :cost         Show the cost of this session so far
  :h, :help     Show this help message"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command(":q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command(":quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  :quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_clear_and_undo() {
        assert_eq!(parse_command(":c"), Some(ChatCommand::Clear));
        assert_eq!(parse_command(":clear"), Some(ChatCommand::Clear));
        assert_eq!(parse_command(":u"), Some(ChatCommand::Undo));
        assert_eq!(parse_command(":undo"), Some(ChatCommand::Undo));
    }

    #[test]
    fn parse_cost_and_help() {
        assert_eq!(parse_command(":cost"), Some(ChatCommand::Cost));
        assert_eq!(parse_command(":h"), Some(ChatCommand::Help));
        assert_eq!(parse_command(":help"), Some(ChatCommand::Help));
    }

    #[test]
    fn unknown_commands_keep_input() {
        assert_eq!(
            parse_command(":x"),
            Some(ChatCommand::Invalid(":x".to_string()))
        );
        assert_eq!(
            parse_command(":Q"),
            Some(ChatCommand::Invalid(":Q".to_string()))
        );
        assert_eq!(
            parse_command(":quit now"),
            Some(ChatCommand::Invalid(":quit now".to_string()))
        );
        assert_eq!(
            parse_command(":"),
            Some(ChatCommand::Invalid(":".to_string()))
        );
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello!"), None);
        assert_eq!(parse_command("what does :q do?"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_lists_commands() {
        let help = help_text();
        for command in [":quit", ":clear", ":undo", ":cost", ":help"] {
            assert!(help.contains(command), "missing {command}");
        }
    }
}
