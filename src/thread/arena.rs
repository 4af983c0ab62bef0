//! Index-based reply graph with parent links

use std::collections::HashMap;

use super::ThreadNode;
use crate::models::Post;

#[derive(Debug, Clone)]
struct Slot {
    post: Post,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Posts stored by index, each knowing its parent and children.
///
/// Parent links are plain indices, so the structure stays acyclic from the
/// borrow checker's point of view and can be cloned and sent across threads.
#[derive(Debug, Clone, Default)]
pub struct ThreadArena {
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
    roots: Vec<usize>,
}

impl ThreadArena {
    /// Index `posts` and link each reply to its parent.
    ///
    /// A later post with an already-seen id replaces the earlier one but keeps
    /// its position. A post is a root when it has no parent id or its parent is
    /// not part of `posts`. Children are ordered oldest first.
    pub fn build(posts: impl IntoIterator<Item = Post>) -> Self {
        let mut slots: Vec<Slot> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for post in posts {
            if let Some(&i) = index.get(&post.id) {
                slots[i].post = post;
            } else {
                index.insert(post.id.clone(), slots.len());
                slots.push(Slot {
                    post,
                    parent: None,
                    children: Vec::new(),
                });
            }
        }

        for i in 0..slots.len() {
            slots[i].parent = slots[i]
                .post
                .in_reply_to_id
                .as_ref()
                .and_then(|parent_id| index.get(parent_id).copied())
                .filter(|&p| p != i);
        }

        let mut roots = Vec::new();
        for i in 0..slots.len() {
            let parent = slots[i].parent;
            match parent {
                Some(p) => slots[p].children.push(i),
                None => roots.push(i),
            }
        }

        for i in 0..slots.len() {
            let mut children = std::mem::take(&mut slots[i].children);
            children.sort_by_key(|&c| slots[c].post.created_at);
            slots[i].children = children;
        }

        Self {
            slots,
            index,
            roots,
        }
    }

    /// Number of distinct posts
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the arena holds no posts
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Root posts, in first-seen order
    pub fn roots(&self) -> Vec<&Post> {
        self.roots.iter().map(|&i| &self.slots[i].post).collect()
    }

    /// Look up a post by id
    pub fn get(&self, id: &str) -> Option<&Post> {
        self.index.get(id).map(|&i| &self.slots[i].post)
    }

    /// The post `id` replies to, if it is part of the arena
    pub fn parent_of(&self, id: &str) -> Option<&Post> {
        let i = *self.index.get(id)?;
        self.slots[i].parent.map(|p| &self.slots[p].post)
    }

    /// Direct replies to `id`, oldest first
    pub fn children_of(&self, id: &str) -> Vec<&Post> {
        self.index.get(id).map_or_else(Vec::new, |&i| {
            self.slots[i]
                .children
                .iter()
                .map(|&c| &self.slots[c].post)
                .collect()
        })
    }

    /// Ancestry of `id`: the post itself first, its root last.
    ///
    /// Empty if `id` is unknown. Stops early if the parent links loop, which
    /// only happens when the input violates reply ordering.
    pub fn path_to_root(&self, id: &str) -> Vec<&Post> {
        let mut path = Vec::new();
        let mut current = self.index.get(id).copied();
        while let Some(i) = current {
            if path.len() == self.slots.len() {
                tracing::debug!("Reply cycle detected while walking up from {id}");
                break;
            }
            path.push(&self.slots[i].post);
            current = self.slots[i].parent;
        }
        path
    }

    /// Root of the thread containing `id`
    pub fn root_of(&self, id: &str) -> Option<&Post> {
        self.path_to_root(id).last().copied()
    }

    fn take_node(slots: &mut [Option<Slot>], i: usize) -> Option<ThreadNode> {
        let slot = slots[i].take()?;
        let children = slot
            .children
            .iter()
            .filter_map(|&c| Self::take_node(slots, c))
            .collect();
        Some(ThreadNode {
            post: slot.post,
            children,
        })
    }

    /// Convert into owned reply trees, one per root
    pub fn into_forest(self) -> Vec<ThreadNode> {
        let mut slots: Vec<Option<Slot>> = self.slots.into_iter().map(Some).collect();
        self.roots
            .iter()
            .filter_map(|&r| Self::take_node(&mut slots, r))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thread::tests::post;

    fn ids(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_path_to_root() {
        let arena = ThreadArena::build(vec![
            post("1", None, 0),
            post("2", Some("1"), 1),
            post("3", Some("2"), 2),
            post("4", Some("1"), 3),
        ]);
        assert_eq!(ids(&arena.path_to_root("3")), vec!["3", "2", "1"]);
        assert_eq!(ids(&arena.path_to_root("1")), vec!["1"]);
        assert!(arena.path_to_root("missing").is_empty());
        assert_eq!(arena.root_of("3").map(|p| p.id.as_str()), Some("1"));
    }

    #[test]
    fn test_parent_and_children() {
        let arena = ThreadArena::build(vec![
            post("4", Some("1"), 3),
            post("1", None, 0),
            post("2", Some("1"), 1),
        ]);
        assert_eq!(arena.parent_of("2").map(|p| p.id.as_str()), Some("1"));
        assert!(arena.parent_of("1").is_none());
        assert_eq!(ids(&arena.children_of("1")), vec!["2", "4"]);
        assert!(arena.children_of("nope").is_empty());
    }

    #[test]
    fn test_parent_outside_window_is_root() {
        let arena = ThreadArena::build(vec![post("5", Some("404"), 0), post("6", Some("5"), 1)]);
        assert_eq!(ids(&arena.roots()), vec!["5"]);
        assert_eq!(ids(&arena.path_to_root("6")), vec!["6", "5"]);
    }

    #[test]
    fn test_duplicate_id_last_write_wins() {
        let first = post("1", None, 0).with_content("old");
        let second = post("1", None, 0).with_content("new");
        let arena = ThreadArena::build(vec![first, second]);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.get("1").map(|p| p.content.as_str()), Some("new"));
    }

    #[test]
    fn test_cycle_is_bounded() {
        let arena = ThreadArena::build(vec![post("a", Some("b"), 0), post("b", Some("a"), 1)]);
        assert!(arena.roots().is_empty());
        assert_eq!(arena.path_to_root("a").len(), 2);
        assert!(arena.into_forest().is_empty());
    }

    #[test]
    fn test_self_reply_is_root() {
        let arena = ThreadArena::build(vec![post("x", Some("x"), 0)]);
        assert_eq!(ids(&arena.roots()), vec!["x"]);
    }
}
