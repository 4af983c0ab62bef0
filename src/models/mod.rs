//! Data models for Tusk

mod account;
mod conversation;
mod post;

pub use account::Account;
pub use conversation::Conversation;
pub use post::{CustomEmoji, Post};
