//! The object storage capability.
//!
//! [`NodeObject`] is the interface between the node tree and whatever
//! physically stores a string-keyed mapping of nodes: the built-in
//! in-memory backend, or an out-of-crate adapter registered with the
//! backend registry. The tree's path resolver walks node by node, so a
//! backend only ever deals in single-key operations and cursors.
//!
//! Implementations own their entries: an inserted node transfers into the
//! container, a removed node leaves it. Iteration order is
//! backend-defined; the default backend is unordered.

use std::any::Any;

use crate::Result;
use crate::cursor::Cursor;
use crate::node::Node;

/// Storage capability for a string-keyed unordered mapping of nodes.
///
/// A `NodeObject` is always bound to exactly one owning [`Node`], the node
/// whose Object alternative holds it. The binding is a non-owning
/// back-reference used for path-relative resolution, installed by
/// [`NodeObject::bind_owner`] when the backend is attached.
pub trait NodeObject: std::fmt::Debug {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns true if there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all entries.
    fn clear(&mut self);

    /// Returns true if `key` has an entry.
    fn contains(&self, key: &str) -> bool;

    /// Insert-or-get: returns the entry under `key`, creating a fresh Null
    /// entry when absent. Never fails on a duplicate key.
    fn entry(&mut self, key: &str) -> Node;

    /// Read-only lookup. Fails with `KeyNotFound` when absent.
    fn find(&self, key: &str) -> Result<Node>;

    /// Removes the entry under `key`, returning it if present. Removing an
    /// absent key is a no-op returning `None`.
    fn remove(&mut self, key: &str) -> Option<Node>;

    /// Cursor over the entry values.
    fn children(&self) -> Cursor<Node>;

    /// Cursor over (key, value) pairs.
    fn kv_items(&self) -> Cursor<(String, Node)>;

    /// Binds the owning node back-reference. Called once when the backend
    /// is installed as a node's Object alternative.
    fn bind_owner(&mut self, owner: &Node);

    /// The owning node, if the backend has been bound.
    fn owner(&self) -> Option<Node>;

    /// Copies this backend. Entry handles are shared with the copy; the
    /// owner binding is not carried over.
    fn boxed_clone(&self) -> Box<dyn NodeObject>;

    /// Downcasting escape hatch for backend-specific access.
    fn as_any(&self) -> &dyn Any;
}
