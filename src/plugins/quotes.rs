//! Quote commands: quote / quotes.

use teloxide::prelude::*;
use tracing::info;

use super::{reply_html, reply_store_failure};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{DocumentStore, OpContext, Quote, StoreError, QUOTES};
use crate::utils::{format_username, html_escape};

/// Most recent quotes shown by the `quotes` command.
const MAX_LISTED: usize = 20;

/// Store a new quote.
pub async fn save<S: DocumentStore>(
    store: &S,
    ctx: &OpContext,
    db: &str,
    quote: &Quote,
) -> Result<(), StoreError> {
    store.insert(ctx, db, QUOTES, quote).await
}

/// Every quote of a chat, oldest first.
pub async fn list<S: DocumentStore>(
    store: &S,
    ctx: &OpContext,
    db: &str,
    chat_id: i64,
) -> Result<Vec<Quote>, StoreError> {
    let mut quotes: Vec<Quote> = store.find_all(ctx, db, QUOTES, Quote::chat_filter(chat_id)).await?;
    quotes.sort_by_key(|q| q.created_at);
    Ok(quotes)
}

/// Handle `quote <text>`.
///
/// Replying to a message quotes that message instead of the argument text.
pub async fn quote_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    let (author, text) = match msg.reply_to_message() {
        Some(reply) => (reply.from.as_ref(), reply.text().unwrap_or_default().to_string()),
        None => (msg.from.as_ref(), args.trim().to_string()),
    };

    if text.is_empty() {
        let usage = format!(
            "Usage: <code>{}quote &lt;text&gt;</code> or reply to a message",
            html_escape(&state.command_prefix)
        );
        return reply_html(&bot, &msg, usage).await;
    }

    let author = author
        .map(|u| format_username(u.username.as_deref(), &u.first_name))
        .unwrap_or_else(|| "anonymous".to_string());
    let quote = Quote::new(msg.chat.id.0, author, text);

    let ctx = state.op_context();
    if let Err(e) = save(&*state.store, &ctx, &state.database, &quote).await {
        return reply_store_failure(&bot, &msg, &e).await;
    }

    info!("Saved quote in chat {}", msg.chat.id);
    reply_html(&bot, &msg, "💬 Quote saved").await
}

/// Handle `quotes`.
pub async fn quotes_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let ctx = state.op_context();
    let quotes = match list(&*state.store, &ctx, &state.database, msg.chat.id.0).await {
        Ok(quotes) => quotes,
        Err(e) => return reply_store_failure(&bot, &msg, &e).await,
    };

    reply_html(&bot, &msg, render_list(&quotes)).await
}

fn render_list(quotes: &[Quote]) -> String {
    if quotes.is_empty() {
        return "No quotes saved yet.".to_string();
    }

    let skipped = quotes.len().saturating_sub(MAX_LISTED);
    let mut text = format!("<b>Quotes ({})</b>\n", quotes.len());
    for quote in &quotes[skipped..] {
        text.push_str(&format!(
            "«{}» — {} ({})\n",
            html_escape(&quote.text),
            html_escape(&quote.author),
            quote.date()
        ));
    }
    text
}
