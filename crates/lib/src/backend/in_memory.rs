//! The default in-memory object backend.

use std::any::Any;
use std::collections::HashMap;

use crate::Result;
use crate::cursor::Cursor;
use crate::node::{Node, NodeError, NodeObject, WeakNode};

/// In-memory object storage over a hash map.
///
/// This is the backend behind every Object node that was not explicitly
/// attached to something else. Entries are unordered; lookup is amortized
/// O(key). Cursors snapshot the entry handles at creation time, so an
/// open traversal keeps working while the map changes, with unspecified
/// visibility of the change.
#[derive(Debug, Default)]
pub struct InMemoryObject {
    entries: HashMap<String, Node>,
    owner: WeakNode,
}

impl InMemoryObject {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs an existing node handle under `key`, replacing any previous
    /// entry. Wrapping backends use this to share entry handles instead of
    /// copying subtrees.
    pub fn insert_node(&mut self, key: impl Into<String>, node: Node) {
        self.entries.insert(key.into(), node);
    }
}

impl NodeObject for InMemoryObject {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn entry(&mut self, key: &str) -> Node {
        self.entries.entry(key.to_string()).or_default().clone()
    }

    fn find(&self, key: &str) -> Result<Node> {
        self.entries.get(key).cloned().ok_or_else(|| {
            NodeError::KeyNotFound {
                key: key.to_string(),
            }
            .into()
        })
    }

    fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.remove(key)
    }

    fn children(&self) -> Cursor<Node> {
        let nodes: Vec<Node> = self.entries.values().cloned().collect();
        Cursor::from_iter(nodes)
    }

    fn kv_items(&self) -> Cursor<(String, Node)> {
        let items: Vec<(String, Node)> = self
            .entries
            .iter()
            .map(|(key, node)| (key.clone(), node.clone()))
            .collect();
        Cursor::from_iter(items)
    }

    fn bind_owner(&mut self, owner: &Node) {
        self.owner = owner.downgrade();
    }

    fn owner(&self) -> Option<Node> {
        self.owner.upgrade()
    }

    fn boxed_clone(&self) -> Box<dyn NodeObject> {
        Box::new(InMemoryObject {
            entries: self.entries.clone(),
            owner: WeakNode::default(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_is_insert_or_get() {
        let mut object = InMemoryObject::new();
        let first = object.entry("a");
        first.set(1);
        let second = object.entry("a");
        assert!(Node::ptr_eq(&first, &second));
        assert_eq!(object.len(), 1);
    }

    #[test]
    fn test_find_missing_key() {
        let object = InMemoryObject::new();
        let err = object.find("absent").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut object = InMemoryObject::new();
        assert!(object.remove("absent").is_none());
        object.entry("a").set(1);
        assert!(object.remove("a").is_some());
        assert!(object.is_empty());
    }

    #[test]
    fn test_cursors_snapshot_handles() {
        let mut object = InMemoryObject::new();
        object.entry("a").set(1);
        object.entry("b").set(2);

        let mut keys: Vec<String> = object.kv_items().map(|(key, _)| key).collect();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(object.children().count(), 2);
    }

    #[test]
    fn test_owner_binding() {
        let mut object = InMemoryObject::new();
        assert!(object.owner().is_none());
        let node = Node::new();
        object.bind_owner(&node);
        assert!(Node::ptr_eq(&object.owner().unwrap(), &node));
    }
}
