//! Slash commands

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub(crate) enum Command {
    #[command(description = "Show the main menu.")]
    Start,
    #[command(description = "Show how to use the bot.")]
    Help,
    #[command(description = "Drop the current operation.")]
    Cancel,
}

impl Command {
    /// Parses `text` as one of the bot commands, accepting the `/cmd@bot` form.
    pub(crate) fn from_text(text: &str, username: &str) -> Option<Self> {
        let text = text.trim();
        if !text.starts_with('/') {
            return None;
        }
        Self::parse(text, username).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(Command::from_text("/start", "finbot"), Some(Command::Start));
        assert_eq!(Command::from_text(" /help ", "finbot"), Some(Command::Help));
        assert_eq!(
            Command::from_text("/cancel@finbot", "finbot"),
            Some(Command::Cancel)
        );
    }

    #[test]
    fn other_text_is_not_a_command() {
        assert_eq!(Command::from_text("start", "finbot"), None);
        assert_eq!(Command::from_text("/stats", "finbot"), None);
        assert_eq!(Command::from_text("150", "finbot"), None);
    }
}
