//! Parsing helpers for command arguments.

/// Split `"<key> <rest>"` into the key and the trimmed remainder.
///
/// Returns `None` unless both parts are non-empty.
pub fn split_key_value(args: &str) -> Option<(&str, &str)> {
    let (key, value) = args.trim().split_once(char::is_whitespace)?;
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// First whitespace-separated word of `args`, if any.
pub fn first_word(args: &str) -> Option<&str> {
    args.split_whitespace().next()
}

/// Escape text for Telegram HTML parse mode.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Truncate to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
