//! Scratch memory commands: set / get / del.
//!
//! Values live in process memory only and are shared by all chats.

use teloxide::prelude::*;
use tracing::info;

use super::reply_html;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::kv::Kv;
use crate::utils::{first_word, html_escape, split_key_value};

/// Handle `set <key> <value>`.
pub async fn set_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    let Some((key, value)) = split_key_value(&args) else {
        let usage = format!("Usage: <code>{}set &lt;key&gt; &lt;value&gt;</code>", html_escape(&state.command_prefix));
        return reply_html(&bot, &msg, usage).await;
    };

    state.kv.set(key, value.to_string());
    info!("Stored key {} from chat {}", key, msg.chat.id);

    reply_html(&bot, &msg, format!("✅ Stored <code>{}</code>", html_escape(key))).await
}

/// Handle `get <key>`.
pub async fn get_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    let Some(key) = first_word(&args) else {
        let usage = format!("Usage: <code>{}get &lt;key&gt;</code>", html_escape(&state.command_prefix));
        return reply_html(&bot, &msg, usage).await;
    };

    let text = match state.kv.get(key) {
        Some(value) => html_escape(&value),
        None => format!("Nothing stored under <code>{}</code>", html_escape(key)),
    };
    reply_html(&bot, &msg, text).await
}

/// Handle `del <key>`.
pub async fn del_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    let Some(key) = first_word(&args) else {
        let usage = format!("Usage: <code>{}del &lt;key&gt;</code>", html_escape(&state.command_prefix));
        return reply_html(&bot, &msg, usage).await;
    };

    let text = if state.kv.delete(key) {
        format!("🗑 Forgot <code>{}</code>", html_escape(key))
    } else {
        format!("Nothing stored under <code>{}</code>", html_escape(key))
    };
    reply_html(&bot, &msg, text).await
}
