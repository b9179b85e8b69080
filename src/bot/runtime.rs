//! Bot runtime.

use tracing::info;

use super::dispatcher::BotDispatcher;

/// Run the bot in long-polling mode until Ctrl+C.
pub async fn run(mut dispatcher: BotDispatcher) {
    info!("Starting bot in polling mode...");
    dispatcher.dispatch().await;
    info!("Bot stopped");
}
