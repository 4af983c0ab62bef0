//! Merging of paginated timeline fetches

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::models::Post;

/// Where a fetched page sits relative to the list already shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePosition {
    /// Fetched with `since_id`/`min_id`; goes on top
    Newer,
    /// Fetched with `max_id`; goes at the bottom
    Older,
}

/// Merge a fetched page into a newest-first list.
///
/// Items already present are refreshed in place. New items are prepended
/// (`Newer`) or appended (`Older`) in page order. A key repeated within the
/// page keeps its first occurrence.
pub fn merge_page<T, K, F>(existing: Vec<T>, page: Vec<T>, position: PagePosition, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut merged = existing;
    let positions: HashMap<K, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, item)| (key(item), i))
        .collect();

    let mut fresh = Vec::new();
    let mut seen = HashSet::new();
    for item in page {
        let k = key(&item);
        if let Some(&i) = positions.get(&k) {
            if seen.insert(k) {
                merged[i] = item;
            }
        } else if seen.insert(k) {
            fresh.push(item);
        }
    }

    match position {
        PagePosition::Newer => {
            fresh.extend(merged);
            fresh
        }
        PagePosition::Older => {
            merged.extend(fresh);
            merged
        }
    }
}

/// Merge a page of posts, keyed by post id
pub fn merge_posts(existing: Vec<Post>, page: Vec<Post>, position: PagePosition) -> Vec<Post> {
    merge_page(existing, page, position, |p| p.id.clone())
}

/// Pagination parameters derived from the list being shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    /// Oldest id shown; pass as `max_id` to load older posts
    pub max_id: Option<String>,
    /// Newest id shown; pass as `since_id` to load newer posts
    pub since_id: Option<String>,
}

impl PageCursor {
    /// Cursor for a newest-first list of posts
    pub fn from_posts(posts: &[Post]) -> Self {
        Self {
            max_id: posts.last().map(|p| p.id.clone()),
            since_id: posts.first().map(|p| p.id.clone()),
        }
    }
}
