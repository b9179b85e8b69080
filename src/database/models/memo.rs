//! Memo model, one document per `(chat_id, key)`.

use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

/// Collection holding memos.
pub const MEMOS: &str = "memos";

/// A remembered snippet of text (stored in `memos` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memo {
    /// Chat ID this memo belongs to
    pub chat_id: i64,

    /// Lookup key (lowercase)
    pub key: String,

    /// Remembered text
    pub text: String,

    /// Unix timestamp of last write
    #[serde(default)]
    pub updated_at: i64,
}

impl Memo {
    /// Filter selecting the memo stored under `key` in `chat_id`.
    pub fn filter(chat_id: i64, key: &str) -> Document {
        doc! { "chat_id": chat_id, "key": key.to_lowercase() }
    }

    /// Filter selecting every memo of a chat.
    pub fn chat_filter(chat_id: i64) -> Document {
        doc! { "chat_id": chat_id }
    }

    /// Field-set update replacing the memo text.
    ///
    /// Applying it twice leaves the same document as applying it once
    /// (apart from the timestamp).
    pub fn set_text(text: &str) -> Document {
        doc! {
            "$set": {
                "text": text,
                "updated_at": chrono::Utc::now().timestamp(),
            }
        }
    }
}
