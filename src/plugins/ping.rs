//! Ping command plugin.
//!
//! Measures and displays Telegram API latency.

use std::time::Instant;

use teloxide::prelude::*;

use super::reply_html;
use crate::bot::dispatcher::{AppState, ThrottledBot};

/// Latency indicator for a round trip of `ms` milliseconds.
fn latency_emoji(ms: u128) -> &'static str {
    if ms < 100 {
        "🟢"
    } else if ms < 300 {
        "🟡"
    } else {
        "🔴"
    }
}

/// Handle the ping command - measures Telegram API latency.
pub async fn ping_command(bot: ThrottledBot, msg: Message, _state: AppState) -> anyhow::Result<()> {
    // getMe is the cheapest authenticated call
    let start = Instant::now();
    let _ = bot.get_me().await;
    let ms = start.elapsed().as_millis();

    let text = format!("{} Pong! <code>{}ms</code>", latency_emoji(ms), ms);
    reply_html(&bot, &msg, text).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_emoji() {
        assert_eq!(latency_emoji(20), "🟢");
        assert_eq!(latency_emoji(150), "🟡");
        assert_eq!(latency_emoji(900), "🔴");
    }
}
