//! Memo commands: remember / recall / memos.
//!
//! One memo per key and chat, persisted through the document store.

use teloxide::prelude::*;
use tracing::info;

use super::{reply_html, reply_store_failure};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{DocumentStore, Memo, OpContext, StoreError, MEMOS};
use crate::utils::{first_word, html_escape, split_key_value, truncate};

/// Create or overwrite the memo stored under `key`.
pub async fn remember<S: DocumentStore>(
    store: &S,
    ctx: &OpContext,
    db: &str,
    chat_id: i64,
    key: &str,
    text: &str,
) -> Result<(), StoreError> {
    store
        .upsert(ctx, db, MEMOS, Memo::filter(chat_id, key), Memo::set_text(text))
        .await
}

/// Look up the memo stored under `key`; `None` if there is none.
pub async fn recall<S: DocumentStore>(
    store: &S,
    ctx: &OpContext,
    db: &str,
    chat_id: i64,
    key: &str,
) -> Result<Option<Memo>, StoreError> {
    match store.find_one(ctx, db, MEMOS, Memo::filter(chat_id, key)).await {
        Ok(memo) => Ok(Some(memo)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Every memo of a chat, sorted by key.
pub async fn list<S: DocumentStore>(
    store: &S,
    ctx: &OpContext,
    db: &str,
    chat_id: i64,
) -> Result<Vec<Memo>, StoreError> {
    let mut memos: Vec<Memo> = store.find_all(ctx, db, MEMOS, Memo::chat_filter(chat_id)).await?;
    memos.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(memos)
}

/// Handle `remember <key> <text>`.
pub async fn remember_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    let Some((key, text)) = split_key_value(&args) else {
        let usage = format!(
            "Usage: <code>{}remember &lt;key&gt; &lt;text&gt;</code>",
            html_escape(&state.command_prefix)
        );
        return reply_html(&bot, &msg, usage).await;
    };

    let ctx = state.op_context();
    if let Err(e) = remember(&*state.store, &ctx, &state.database, msg.chat.id.0, key, text).await {
        return reply_store_failure(&bot, &msg, &e).await;
    }

    info!("Remembered memo {} in chat {}", key, msg.chat.id);
    reply_html(&bot, &msg, format!("📝 Remembered <code>{}</code>", html_escape(&key.to_lowercase()))).await
}

/// Handle `recall <key>`.
pub async fn recall_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    let Some(key) = first_word(&args) else {
        let usage = format!("Usage: <code>{}recall &lt;key&gt;</code>", html_escape(&state.command_prefix));
        return reply_html(&bot, &msg, usage).await;
    };

    let ctx = state.op_context();
    let text = match recall(&*state.store, &ctx, &state.database, msg.chat.id.0, key).await {
        Ok(Some(memo)) => format!("<b>{}</b>\n{}", html_escape(&memo.key), html_escape(&memo.text)),
        Ok(None) => format!("Nothing remembered under <code>{}</code>", html_escape(key)),
        Err(e) => return reply_store_failure(&bot, &msg, &e).await,
    };
    reply_html(&bot, &msg, text).await
}

/// Handle `memos`.
pub async fn memos_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let ctx = state.op_context();
    let memos = match list(&*state.store, &ctx, &state.database, msg.chat.id.0).await {
        Ok(memos) => memos,
        Err(e) => return reply_store_failure(&bot, &msg, &e).await,
    };

    reply_html(&bot, &msg, render_list(&memos)).await
}

fn render_list(memos: &[Memo]) -> String {
    if memos.is_empty() {
        return "No memos in this chat yet.".to_string();
    }

    let mut text = format!("<b>Memos ({})</b>\n", memos.len());
    for memo in memos {
        text.push_str(&format!(
            "• <code>{}</code> {}\n",
            html_escape(&memo.key),
            html_escape(&truncate(&memo.text, 40))
        ));
    }
    text
}
