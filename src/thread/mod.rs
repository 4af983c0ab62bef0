//! Reply-thread reconstruction
//!
//! Builds reply trees out of a flat, unordered window of posts. A post whose
//! parent is not in the window is treated as a root, since nothing outside
//! the window is known.

mod arena;

use serde::Serialize;

pub use arena::ThreadArena;

use crate::models::Post;

/// A post and its replies, oldest reply first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadNode {
    /// The post at this node
    pub post: Post,
    /// Direct replies, sorted by creation time
    pub children: Vec<ThreadNode>,
}

impl ThreadNode {
    /// ID of the post at this node
    pub fn id(&self) -> &str {
        &self.post.id
    }

    /// Number of posts in this subtree
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Self::len).sum::<usize>()
    }

    /// Always false; a node holds at least its own post
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Longest distance to a leaf (0 for a leaf)
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Posts in pre-order: this node, then each reply subtree in turn
    pub fn flatten(&self) -> Vec<&Post> {
        self.flatten_nodes().into_iter().map(|n| &n.post).collect()
    }

    /// Nodes in pre-order
    pub fn flatten_nodes(&self) -> Vec<&ThreadNode> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// First node in pre-order whose post has `id`
    pub fn find(&self, id: &str) -> Option<&ThreadNode> {
        if self.id() == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Build one reply tree per root post.
///
/// Roots come back in the order they were first seen; sort them if a stable
/// order matters. Duplicate ids keep the last post. Posts caught in a parent
/// cycle are unreachable from any root and are left out.
pub fn build_forest(posts: impl IntoIterator<Item = Post>) -> Vec<ThreadNode> {
    ThreadArena::build(posts).into_forest()
}

/// Search a forest for `id`
pub fn find_node<'a>(forest: &'a [ThreadNode], id: &str) -> Option<&'a ThreadNode> {
    forest.iter().find_map(|tree| tree.find(id))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use chrono::{DateTime, Duration, Utc};

    use super::*;
    use crate::models::Account;

    pub(crate) fn post(id: &str, parent: Option<&str>, t: i64) -> Post {
        let created_at = DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(t);
        let post = Post::new(id, Account::new("1", "alice"), created_at);
        match parent {
            Some(parent) => post.in_reply_to(parent),
            None => post,
        }
    }

    fn ids(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_simple_thread() {
        let forest = build_forest(vec![
            post("1", None, 0),
            post("2", Some("1"), 1),
            post("3", Some("1"), 2),
        ]);
        assert_eq!(forest.len(), 1);
        let root = &forest[0];
        assert_eq!(root.id(), "1");
        let children: Vec<_> = root.children.iter().map(ThreadNode::id).collect();
        assert_eq!(children, vec!["2", "3"]);
        assert_eq!(ids(&root.flatten()), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_children_sorted_by_time() {
        let forest = build_forest(vec![
            post("late", Some("r"), 30),
            post("early", Some("r"), 10),
            post("r", None, 0),
            post("mid", Some("r"), 20),
        ]);
        assert_eq!(ids(&forest[0].flatten()), vec!["r", "early", "mid", "late"]);
    }

    #[test]
    fn test_single_post_depth() {
        let forest = build_forest(vec![post("1", None, 0)]);
        assert_eq!(forest[0].depth(), 0);
        assert_eq!(forest[0].len(), 1);
    }

    #[test]
    fn test_depth_is_longest_branch() {
        let forest = build_forest(vec![
            post("1", None, 0),
            post("2", Some("1"), 1),
            post("3", Some("2"), 2),
            post("4", Some("3"), 3),
            post("5", Some("1"), 4),
        ]);
        assert_eq!(forest[0].depth(), 3);
        assert_eq!(forest[0].find("5").map(ThreadNode::depth), Some(0));
    }

    #[test]
    fn test_find_node() {
        let forest = build_forest(vec![
            post("a", None, 0),
            post("b", Some("a"), 1),
            post("x", None, 2),
            post("y", Some("x"), 3),
        ]);
        assert_eq!(find_node(&forest, "y").map(ThreadNode::id), Some("y"));
        assert_eq!(forest[0].find("y"), None);
        assert!(find_node(&forest, "zzz").is_none());
    }

    #[test]
    fn test_flatten_is_repeatable() {
        let forest = build_forest(vec![post("1", None, 0), post("2", Some("1"), 1)]);
        let nodes: Vec<_> = forest[0].flatten_nodes().into_iter().map(ThreadNode::id).collect();
        assert_eq!(nodes, vec!["1", "2"]);
        assert_eq!(forest[0].flatten(), forest[0].flatten());
    }

    #[test]
    fn test_every_post_once_and_after_parent() {
        // A window cut out of a larger conversation: "0" and "q" are missing.
        let posts = vec![
            post("7", Some("3"), 7),
            post("1", Some("0"), 1),
            post("3", Some("1"), 3),
            post("2", Some("1"), 2),
            post("9", None, 9),
            post("5", Some("2"), 5),
            post("8", Some("q"), 8),
            post("6", Some("9"), 10),
            post("4", Some("3"), 4),
        ];
        let parents: HashMap<String, Option<String>> = posts
            .iter()
            .map(|p| (p.id.clone(), p.in_reply_to_id.clone()))
            .collect();

        let forest = build_forest(posts.clone());
        let root_ids: Vec<_> = forest.iter().map(ThreadNode::id).collect();
        assert_eq!(root_ids, vec!["1", "9", "8"]);

        let mut seen = Vec::new();
        for tree in &forest {
            let order = ids(&tree.flatten());
            for (pos, id) in order.iter().enumerate() {
                if let Some(Some(parent)) = parents.get(id)
                    && let Some(parent_pos) = order.iter().position(|x| x == parent)
                {
                    assert!(parent_pos < pos, "{id} before its parent {parent}");
                }
            }
            seen.extend(order);
        }
        seen.sort();
        let mut expected: Vec<_> = posts.iter().map(|p| p.id.clone()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_forest(Vec::new()).is_empty());
    }
}
