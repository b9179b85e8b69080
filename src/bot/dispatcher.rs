//! Message dispatcher setup.
//!
//! Builds the dispatcher with all command handlers.

use std::sync::Arc;
use std::time::Duration;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::database::{MongoRepo, OpContext};
use crate::kv::MemoryKv;
use crate::plugins;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Dispatcher type produced by [`build_dispatcher`].
pub type BotDispatcher = Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Document repository.
    pub store: Arc<MongoRepo>,

    /// Scratch key-value memory.
    pub kv: MemoryKv,

    /// Database the bot's collections live in.
    pub database: String,

    /// Prefix marking a message as a command.
    pub command_prefix: String,

    /// Timeout applied to each store call.
    pub op_timeout: Duration,

    /// Parent of every per-call context; cancelled on shutdown.
    pub root: OpContext,
}

impl AppState {
    pub fn new(
        store: Arc<MongoRepo>,
        kv: MemoryKv,
        database: impl Into<String>,
        command_prefix: impl Into<String>,
        op_timeout: Duration,
        root: OpContext,
    ) -> Self {
        Self {
            store,
            kv,
            database: database.into(),
            command_prefix: command_prefix.into(),
            op_timeout,
            root,
        }
    }

    /// Fresh context for one store call.
    pub fn op_context(&self) -> OpContext {
        self.root.child(Some(self.op_timeout))
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(bot: ThrottledBot, state: AppState) -> BotDispatcher {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    let message_handler = Update::filter_message().branch(plugins::command_handler());

    dptree::entry().branch(message_handler)
}
