//! Grouping of direct-message conversations by participant set

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::handles::normalize_handle;
use crate::models::{Account, Conversation};

/// Conversations that share the same set of other participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedConversation {
    /// `dm:<id>` (1:1), `group:<sorted ids joined with ->` or `self:<local id>`
    pub key: String,
    /// Participants other than the local user
    pub participants: Vec<Account>,
    /// Merged conversations, most recent first
    pub conversations: Vec<Conversation>,
    /// More than one other participant
    pub is_group_chat: bool,
}

impl GroupedConversation {
    /// Latest message time across all merged conversations
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.conversations
            .iter()
            .filter_map(Conversation::last_activity)
            .max()
    }

    /// Whether any merged conversation has unread messages
    pub fn unread(&self) -> bool {
        self.conversations.iter().any(|c| c.unread)
    }

    /// Canonical handles of the participants
    pub fn participant_handles(&self) -> BTreeSet<String> {
        self.participants.iter().filter_map(canonical_handle).collect()
    }
}

/// Group key for a conversation, ignoring the local user.
///
/// Each kind has its own prefix, so an id that contains `-` never collides
/// with a group's joined ids.
fn group_key(others: &[&Account], local_user_id: &str) -> String {
    match others {
        [] => format!("self:{local_user_id}"),
        [single] => format!("dm:{}", single.id),
        many => {
            let ids: BTreeSet<&str> = many.iter().map(|a| a.id.as_str()).collect();
            format!("group:{}", ids.into_iter().collect::<Vec<_>>().join("-"))
        }
    }
}

/// Merge conversations with the same participants, newest group first.
///
/// Groups without any message sort after all others.
pub fn group_conversations(
    conversations: impl IntoIterator<Item = Conversation>,
    local_user_id: &str,
) -> Vec<GroupedConversation> {
    let mut groups: Vec<GroupedConversation> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for conversation in conversations {
        let mut seen = HashSet::new();
        let others: Vec<&Account> = conversation
            .accounts
            .iter()
            .filter(|a| a.id != local_user_id && seen.insert(a.id.as_str()))
            .collect();
        let key = group_key(&others, local_user_id);

        if let Some(&i) = by_key.get(&key) {
            groups[i].conversations.push(conversation);
            continue;
        }

        let participants = others.into_iter().cloned().collect::<Vec<_>>();
        by_key.insert(key.clone(), groups.len());
        groups.push(GroupedConversation {
            key,
            is_group_chat: participants.len() > 1,
            participants,
            conversations: vec![conversation],
        });
    }

    for group in &mut groups {
        group
            .conversations
            .sort_by_key(|c| std::cmp::Reverse(c.last_activity()));
    }
    // `Reverse(None)` sorts after every `Reverse(Some(_))`.
    groups.sort_by_key(|g| std::cmp::Reverse(g.last_activity()));

    groups
}

/// Preferred handle for an account.
///
/// Candidates come from `acct`, `username` and `username@<profile host>`. A
/// full `user@host` form wins over a bare username; ties go to the
/// alphabetically first.
pub fn canonical_handle(account: &Account) -> Option<String> {
    let mut candidates: Vec<String> = [Some(account.acct.clone()), Some(account.username.clone())]
        .into_iter()
        .chain(std::iter::once(
            account
                .url_host()
                .map(|host| format!("{}@{host}", account.username)),
        ))
        .flatten()
        .filter_map(|c| normalize_handle(&c))
        .collect();
    candidates.sort();

    candidates
        .iter()
        .find(|c| c.contains('@'))
        .or_else(|| candidates.first())
        .cloned()
}

/// Groups whose participants are exactly `handles` (already normalized)
pub fn exact_participant_matches<'a>(
    groups: &'a [GroupedConversation],
    handles: &HashSet<String>,
) -> Vec<&'a GroupedConversation> {
    groups
        .iter()
        .filter(|g| {
            let canonical: HashSet<String> =
                g.participants.iter().filter_map(canonical_handle).collect();
            canonical == *handles
        })
        .collect()
}
