//! Slash command parsing for the chat application.
//!
//! Input starting with `/` controls the session locally and is never sent to
//! the model.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Advance the theme cycle, or select the named theme.
    Theme(Option<String>),

    /// Open a fresh session and re-seed the conversation.
    Reset,

    /// Display session statistics.
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be sent as a message.
///
/// # Examples
///
/// ```
/// # use edu_assistant::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/theme high-contrast").is_some());
/// assert!(parse_command("What is PROJ-BLE?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "theme" => ChatCommand::Theme(argument.map(|s| s.to_lowercase())),
        "reset" | "clear" => no_argument(ChatCommand::Reset, "/reset", argument),
        "stats" | "status" => ChatCommand::Stats,
        "config" => ChatCommand::ShowConfig,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn no_argument(command: ChatCommand, name: &str, argument: Option<&str>) -> ChatCommand {
    match argument {
        Some(_) => ChatCommand::Invalid(format!("{} takes no arguments", name)),
        None => command,
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /theme [name]          Switch to the next theme, or to the named one
  /reset                 Start a new session and conversation
  /stats                 Show session statistics
  /config                Show current configuration
  /help                  Show this help message
  /quit                  Exit the chat

Press Enter to send.  Alt-Enter inserts a newline."#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_theme() {
        assert_eq!(parse_command("/theme"), Some(ChatCommand::Theme(None)));
        assert_eq!(
            parse_command("/theme  High-Contrast "),
            Some(ChatCommand::Theme(Some("high-contrast".to_string())))
        );
    }

    #[test]
    fn parse_reset() {
        assert_eq!(parse_command("/reset"), Some(ChatCommand::Reset));
        assert_eq!(parse_command("/CLEAR"), Some(ChatCommand::Reset));
        assert!(matches!(
            parse_command("/reset now"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("no arguments")
        ));
    }

    #[test]
    fn parse_stats_and_config() {
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/config"), Some(ChatCommand::ShowConfig));
        assert_eq!(parse_command("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn unknown_command_is_invalid() {
        assert_eq!(
            parse_command("/model gemini-2.5-pro"),
            Some(ChatCommand::Invalid("Unknown command: /model".to_string()))
        );
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("What is PROJ-BLE?"), None);
        assert_eq!(parse_command("a/b"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_lists_commands() {
        let help = help_text();
        for command in ["/theme", "/reset", "/stats", "/config", "/help", "/quit"] {
            assert!(help.contains(command), "missing {command}");
        }
    }
}
