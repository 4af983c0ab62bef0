//! Post/Status model

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Account;
use crate::content::{self, EmojiLookup, PlainTextStyle};

/// A post/status as delivered by a Mastodon-compatible server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Server-side status ID
    pub id: String,
    /// Post body (HTML as rendered by the server)
    pub content: String,
    /// Parent status ID (if this is a reply)
    pub in_reply_to_id: Option<String>,
    /// When the post was created
    pub created_at: DateTime<Utc>,
    /// Author of the post
    pub author: Account,
    /// Custom emoji referenced by the content
    #[serde(default)]
    pub emojis: Vec<CustomEmoji>,
    /// URL to the post on the web
    #[serde(default)]
    pub url: Option<String>,
    /// Display name of the booster (if this post arrived as a boost)
    #[serde(default)]
    pub reblogged_by: Option<String>,
}

/// A custom emoji declared by the author's instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomEmoji {
    /// Shortcode without the surrounding colons
    pub shortcode: String,
    /// Image URL
    pub url: String,
    /// Non-animated image URL
    #[serde(default)]
    pub static_url: Option<String>,
}

impl Post {
    /// Create a new post with empty content
    pub fn new(id: impl Into<String>, author: Account, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            content: String::new(),
            in_reply_to_id: None,
            created_at,
            author,
            emojis: Vec::new(),
            url: None,
            reblogged_by: None,
        }
    }

    /// Set the HTML body
    pub fn with_content(mut self, html: impl Into<String>) -> Self {
        self.content = html.into();
        self
    }

    /// Mark this post as a reply to `parent_id`
    pub fn in_reply_to(mut self, parent_id: impl Into<String>) -> Self {
        self.in_reply_to_id = Some(parent_id.into());
        self
    }

    /// Whether this post replies to another one
    pub const fn is_reply(&self) -> bool {
        self.in_reply_to_id.is_some()
    }

    /// Shortcode -> image URL map for this post's emoji
    pub fn emoji_lookup(&self) -> EmojiLookup {
        self.emojis
            .iter()
            .map(|e| (e.shortcode.clone(), e.url.clone()))
            .collect::<HashMap<_, _>>()
    }

    /// Content as plain text
    pub fn plain_text(&self, style: PlainTextStyle) -> String {
        content::strip_to_plain_text_with(&self.content, style)
    }

    /// Get a short single-line preview of the content
    pub fn preview(&self, max_chars: usize) -> String {
        let text = content::strip_to_plain_text(&self.content);
        if text.chars().count() <= max_chars {
            text
        } else {
            let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
            format!("{}…", cut.trim_end())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(html: &str) -> Post {
        Post::new("1", Account::new("10", "alice"), DateTime::<Utc>::UNIX_EPOCH).with_content(html)
    }

    #[test]
    fn test_emoji_lookup() {
        let mut p = post("");
        p.emojis.push(CustomEmoji {
            shortcode: "blobcat".to_string(),
            url: "https://cdn.example/blobcat.png".to_string(),
            static_url: None,
        });
        let lookup = p.emoji_lookup();
        assert_eq!(
            lookup.get("blobcat").map(String::as_str),
            Some("https://cdn.example/blobcat.png")
        );
    }

    #[test]
    fn test_preview_truncates_on_chars() {
        let p = post("<p>héllo wörld, this is long</p>");
        assert_eq!(p.preview(100), "héllo wörld, this is long");
        assert_eq!(p.preview(6), "héllo…");
    }

    #[test]
    fn test_is_reply() {
        assert!(!post("").is_reply());
        assert!(post("").in_reply_to("0").is_reply());
    }
}
