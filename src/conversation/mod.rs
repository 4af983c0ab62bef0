//! Recipient handle parsing and direct-message grouping

mod grouping;
mod handles;

pub use grouping::{
    GroupedConversation, canonical_handle, exact_participant_matches, group_conversations,
};
pub use handles::{HandleTokens, normalize_handle, search_query_variants, tokenize};
