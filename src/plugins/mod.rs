//! Plugin system for command handlers.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Adding a variant to [`Command`] and a branch to `command_handler()`

pub mod help;
pub mod memory;
pub mod memos;
pub mod ping;
pub mod quotes;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{Me, ParseMode, ReplyParameters};
use teloxide::utils::command::BotCommands;
use tracing::warn;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::StoreError;

/// All bot commands.
///
/// Parsed with `!` as the canonical prefix; the configured prefix is mapped
/// onto it before parsing.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(prefix = "!", rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Show this list")]
    Help,

    #[command(description = "Check bot latency")]
    Ping,

    // Scratch memory
    #[command(description = "<key> <value> - Store a value in memory")]
    Set(String),

    #[command(description = "<key> - Read a value from memory")]
    Get(String),

    #[command(description = "<key> - Forget a value from memory")]
    Del(String),

    // Memos
    #[command(description = "<key> <text> - Save a memo for this chat")]
    Remember(String),

    #[command(description = "<key> - Show a memo")]
    Recall(String),

    #[command(description = "List memos of this chat")]
    Memos,

    // Quotes
    #[command(description = "<text> - Save a quote")]
    Quote(String),

    #[command(description = "List quotes of this chat")]
    Quotes,
}

/// Parse `text` as a command using `prefix` in place of `!`.
pub fn parse_command(text: &str, prefix: &str, bot_username: &str) -> Option<Command> {
    let rest = text.strip_prefix(prefix)?;
    Command::parse(&format!("!{rest}"), bot_username).ok()
}

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    dptree::filter_map(|msg: Message, state: AppState, me: Me| {
        parse_command(msg.text()?, &state.command_prefix, me.username())
    })
    .branch(case![Command::Help].endpoint(help::help_command))
    .branch(case![Command::Ping].endpoint(ping::ping_command))
    // Scratch memory
    .branch(case![Command::Set(args)].endpoint(memory::set_command))
    .branch(case![Command::Get(args)].endpoint(memory::get_command))
    .branch(case![Command::Del(args)].endpoint(memory::del_command))
    // Memos
    .branch(case![Command::Remember(args)].endpoint(memos::remember_command))
    .branch(case![Command::Recall(args)].endpoint(memos::recall_command))
    .branch(case![Command::Memos].endpoint(memos::memos_command))
    // Quotes
    .branch(case![Command::Quote(args)].endpoint(quotes::quote_command))
    .branch(case![Command::Quotes].endpoint(quotes::quotes_command))
}

/// Reply to `msg` with HTML text.
pub async fn reply_html(bot: &ThrottledBot, msg: &Message, text: impl Into<String>) -> anyhow::Result<()> {
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

/// Tell the user a store call failed. The failure is logged, not retried.
pub async fn reply_store_failure(
    bot: &ThrottledBot,
    msg: &Message,
    err: &StoreError,
) -> anyhow::Result<()> {
    warn!("Store call failed in chat {}: {}", msg.chat.id, err);

    let text = if err.is_cancelled() {
        "⏳ Storage took too long to answer, try again later."
    } else {
        "⚠️ Storage is unavailable right now."
    };
    reply_html(bot, msg, text).await
}
