//! Mastodon API entities

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{Account, Conversation, CustomEmoji, Post};

/// Decode a JSON array of statuses (timelines, search results)
pub fn parse_statuses(json: &str) -> Result<Vec<Post>> {
    let statuses: Vec<MastodonStatus> =
        serde_json::from_str(json).context("Failed to parse statuses")?;
    Ok(statuses.into_iter().map(MastodonStatus::into_post).collect())
}

/// Decode a single status (`/statuses/:id`)
pub fn parse_status(json: &str) -> Result<Post> {
    let status: MastodonStatus = serde_json::from_str(json).context("Failed to parse status")?;
    Ok(status.into_post())
}

/// Decode a `/statuses/:id/context` response: ancestors, then descendants.
///
/// The focal status itself is not part of the response; direct replies to it
/// only nest under it once it is added to the list.
pub fn parse_context(json: &str) -> Result<Vec<Post>> {
    let context: ContextResponse =
        serde_json::from_str(json).context("Failed to parse context response")?;
    Ok(context
        .ancestors
        .into_iter()
        .chain(context.descendants)
        .map(MastodonStatus::into_post)
        .collect())
}

/// Decode a `/conversations` response
pub fn parse_conversations(json: &str) -> Result<Vec<Conversation>> {
    let conversations: Vec<MastodonConversation> =
        serde_json::from_str(json).context("Failed to parse conversations")?;
    Ok(conversations
        .into_iter()
        .map(|c| Conversation {
            id: c.id,
            accounts: c
                .accounts
                .into_iter()
                .map(MastodonAccount::into_account)
                .collect(),
            last_status: c.last_status.map(MastodonStatus::into_post),
            unread: c.unread.unwrap_or(false),
        })
        .collect())
}

// ==================== API Types ====================

#[derive(Debug, Deserialize)]
struct ContextResponse {
    #[serde(default)]
    ancestors: Vec<MastodonStatus>,
    #[serde(default)]
    descendants: Vec<MastodonStatus>,
}

#[derive(Debug, Deserialize)]
struct MastodonStatus {
    id: String,
    created_at: String,
    #[serde(default)]
    content: String,
    url: Option<String>,
    account: MastodonAccount,
    reblog: Option<Box<Self>>,
    in_reply_to_id: Option<String>,
    #[serde(default)]
    emojis: Vec<MastodonEmoji>,
}

#[derive(Debug, Deserialize)]
struct MastodonAccount {
    id: String,
    username: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    acct: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MastodonEmoji {
    shortcode: String,
    url: String,
    static_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MastodonConversation {
    id: String,
    #[serde(default)]
    accounts: Vec<MastodonAccount>,
    last_status: Option<MastodonStatus>,
    unread: Option<bool>,
}

impl MastodonAccount {
    fn into_account(self) -> Account {
        Account {
            id: self.id,
            acct: if self.acct.is_empty() {
                self.username.clone()
            } else {
                self.acct
            },
            display_name: self.display_name,
            username: self.username,
            url: self.url,
        }
    }
}

impl MastodonStatus {
    fn into_post(self) -> Post {
        // Handle boosts
        if let Some(reblog) = self.reblog {
            let mut post = reblog.into_post();
            post.reblogged_by = Some(if self.account.display_name.is_empty() {
                self.account.username
            } else {
                self.account.display_name
            });
            return post;
        }

        let created_at = DateTime::parse_from_rfc3339(&self.created_at).map_or_else(
            |e| {
                tracing::debug!("Bad created_at {:?} on status {}: {e}", self.created_at, self.id);
                DateTime::<Utc>::UNIX_EPOCH
            },
            |dt| dt.with_timezone(&Utc),
        );

        Post {
            id: self.id,
            content: self.content,
            in_reply_to_id: self.in_reply_to_id,
            created_at,
            author: self.account.into_account(),
            emojis: self
                .emojis
                .into_iter()
                .map(|e| CustomEmoji {
                    shortcode: e.shortcode,
                    url: e.url,
                    static_url: e.static_url,
                })
                .collect(),
            url: self.url,
            reblogged_by: None,
        }
    }
}
