//! Quote model (append-only).

use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

/// Collection holding quotes.
pub const QUOTES: &str = "quotes";

/// A quote saved from a chat (stored in `quotes` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Chat ID this quote belongs to
    pub chat_id: i64,

    /// Display name of whoever saved it
    pub author: String,

    /// Quoted text
    pub text: String,

    /// Unix timestamp of creation
    pub created_at: i64,
}

impl Quote {
    /// Create a new quote stamped with the current time.
    pub fn new(chat_id: i64, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            author: author.into(),
            text: text.into(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Filter selecting every quote of a chat.
    pub fn chat_filter(chat_id: i64) -> Document {
        doc! { "chat_id": chat_id }
    }

    /// Creation date formatted as `YYYY-MM-DD`.
    pub fn date(&self) -> String {
        chrono::DateTime::from_timestamp(self.created_at, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}
