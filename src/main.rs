//! Koala - chat bot service with a generic document store layer.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - MongoDB connection and generic document repository
//! - `cache` - Bounded caches with Moka
//! - `kv` - In-process key-value memory
//! - `bot` - Core bot functionality (with Throttle for API rate limiting)
//! - `plugins` - Command handlers (extensible)
//! - `http` - Heartbeat endpoint
//! - `utils` - Utility functions

mod bot;
mod cache;
mod config;
mod database;
mod http;
mod kv;
mod plugins;
mod utils;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bot::AppState;
use config::Config;
use database::{Database, MongoRepo, OpContext};
use kv::MemoryKv;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("koala=info,teloxide=warn,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Koala...");

    // Nothing is reachable until configuration is valid.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::from(2);
        }
    };
    info!("Configuration loaded successfully");

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    // Connect to MongoDB
    info!("Connecting to MongoDB...");
    let db = Database::connect(&config.mongodb_uri)
        .await
        .context("failed to connect to MongoDB")?;
    let store = Arc::new(MongoRepo::new(db));
    info!("Database connected");

    let kv = MemoryKv::new();
    let root = OpContext::background();

    // Initialize bot with Throttle for automatic rate limiting
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());

    // Get bot info (also validates the token)
    let me = bot.get_me().await.context("failed to authenticate bot")?;
    info!("Bot username: @{}", me.username());

    let state = AppState::new(
        store,
        kv,
        config.mongodb_database.clone(),
        config.command_prefix.clone(),
        config.op_timeout,
        root.clone(),
    );
    let dispatcher = bot::build_dispatcher(bot, state);

    // Both stop on Ctrl+C; an HTTP failure takes the bot down with it.
    let result = tokio::select! {
        _ = bot::run(dispatcher) => Ok(()),
        result = http::serve(config.port) => result,
    };

    // Abort store calls still in flight.
    root.cancel();
    info!("Koala stopped");
    result
}
