//! Decoding of Mastodon API responses
//!
//! The HTTP client lives outside this crate; these functions take the JSON
//! bodies it receives and turn them into models.

pub mod mastodon;

pub use mastodon::{parse_context, parse_conversations, parse_status, parse_statuses};
