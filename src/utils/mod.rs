//! Utility functions.
//!
//! Collection of helper functions used across the bot.

pub mod parser;

pub use parser::{first_word, html_escape, split_key_value, truncate};

/// Format a user for display.
///
/// If the user has a username, returns @username.
/// Otherwise, returns the first name.
pub fn format_username(username: Option<&str>, first_name: &str) -> String {
    match username {
        Some(u) => format!("@{}", u),
        None => first_name.to_string(),
    }
}
