//! Direct-message conversation model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Account, Post};

/// A direct-message conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Server-side conversation ID
    pub id: String,
    /// Participants (the server may or may not include the local user)
    pub accounts: Vec<Account>,
    /// Most recent message
    pub last_status: Option<Post>,
    /// Whether there are unread messages
    #[serde(default)]
    pub unread: bool,
}

impl Conversation {
    /// Timestamp of the last message, if any
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_status.as_ref().map(|s| s.created_at)
    }
}
