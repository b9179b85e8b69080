//! Help command plugin.

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use super::{reply_html, Command};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::utils::html_escape;

/// Command list rendered with the configured prefix.
pub fn help_text(prefix: &str) -> String {
    Command::descriptions()
        .to_string()
        .lines()
        .map(|line| match line.strip_prefix('!') {
            Some(rest) => format!("{prefix}{rest}"),
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Handle the help command.
pub async fn help_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let text = html_escape(&help_text(&state.command_prefix));
    reply_html(&bot, &msg, text).await
}
