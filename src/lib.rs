//! # Tusk 🐘
//!
//! Content, threading and conversation helpers for Mastodon-compatible clients.
//!
//! ## Overview
//!
//! Tusk holds the logic a client needs between the REST API and the screen:
//! turning server HTML into text and styled segments, rebuilding reply trees
//! from flat status lists, and grouping direct messages by who is in them.
//! Everything is pure and synchronous; the HTTP client and the UI live
//! elsewhere.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     API (JSON decoding)                     │
//! │        Statuses, contexts and conversations → models        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │     Content     │ │     Thread      │ │  Conversation   │
//! │                 │ │                 │ │                 │
//! │ • Plain text    │ │ • Reply forest  │ │ • Handle input  │
//! │ • Links, tags   │ │ • Arena + paths │ │ • Normalization │
//! │ • Emoji         │ │ • Flatten/find  │ │ • DM grouping   │
//! │ • Segments      │ │                 │ │                 │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] — Mastodon JSON entities
//! - [`config`] — Configuration management
//! - [`content`] — HTML content transformer
//! - [`conversation`] — Handle parsing and DM grouping
//! - [`gesture`] — Swipe classification
//! - [`models`] — Data models (Post, Account, Conversation)
//! - [`thread`] — Reply-thread builder
//! - [`timeline`] — Paginated list merging
//!
//! ## Example
//!
//! ```
//! use tusk::content;
//!
//! let html = r#"<p>Hello <a href="https://example.com">world</a></p>"#;
//! assert_eq!(content::strip_to_plain_text(html), "Hello world");
//! assert_eq!(content::extract_links(html), vec!["https://example.com"]);
//! ```

#![doc(html_root_url = "https://docs.rs/tusk/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::if_not_else)]
#![allow(clippy::single_match_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::use_self)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::similar_names)]
#![allow(clippy::if_same_then_else)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::branches_sharing_code)]
#![allow(clippy::wrong_self_convention)]
#![allow(clippy::return_self_not_must_use)]

pub mod api;
pub mod config;
pub mod content;
pub mod conversation;
pub mod gesture;
pub mod models;
pub mod paths;
pub mod thread;
pub mod timeline;

// Re-export main types for convenience
pub use config::Config;
pub use content::{EmojiLookup, PlainTextStyle, Segment};
pub use conversation::{GroupedConversation, HandleTokens};
pub use models::{Account, Conversation, CustomEmoji, Post};
pub use thread::{ThreadArena, ThreadNode, build_forest};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Repository URL
pub const REPO_URL: &str = "https://github.com/ricardodantas/tusk";
