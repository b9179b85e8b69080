//! Documents written by the bot's own commands.

pub mod memo;
pub mod quote;

pub use memo::{Memo, MEMOS};
pub use quote::{Quote, QUOTES};
