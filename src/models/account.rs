//! Account model

use serde::{Deserialize, Serialize};

/// A remote or local account as seen by the client
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    /// Server-side account ID
    pub id: String,
    /// Username without instance
    pub username: String,
    /// `username` for local accounts, `username@host` for remote ones
    #[serde(default)]
    pub acct: String,
    /// Display name (for UI)
    #[serde(default)]
    pub display_name: String,
    /// Profile URL
    #[serde(default)]
    pub url: Option<String>,
}

impl Account {
    /// Create an account known only by id and username
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            id: id.into(),
            acct: username.clone(),
            display_name: username.clone(),
            username,
            url: None,
        }
    }

    /// Set the `acct` field
    pub fn with_acct(mut self, acct: impl Into<String>) -> Self {
        self.acct = acct.into();
        self
    }

    /// Set the profile URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Host part of the profile URL
    pub fn url_host(&self) -> Option<String> {
        let url = url::Url::parse(self.url.as_deref()?).ok()?;
        url.host_str().map(str::to_lowercase)
    }

    /// Get the full handle with instance, e.g. `@user@mastodon.social`
    pub fn full_handle(&self) -> String {
        if self.acct.contains('@') {
            format!("@{}", self.acct)
        } else if let Some(host) = self.url_host() {
            format!("@{}@{}", self.username, host)
        } else {
            format!("@{}", self.username)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_handle() {
        let remote = Account::new("1", "bob").with_acct("bob@example.org");
        assert_eq!(remote.full_handle(), "@bob@example.org");

        let local = Account::new("2", "alice").with_url("https://Mastodon.Social/@alice");
        assert_eq!(local.full_handle(), "@alice@mastodon.social");

        assert_eq!(Account::new("3", "carol").full_handle(), "@carol");
    }
}
