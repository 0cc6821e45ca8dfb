//! The ordered node container.
//!
//! [`NodeArray`] is the concrete 0-indexed sequence behind a node's Array
//! alternative. Elements are node handles: cloning an array or slicing it
//! shares the element handles rather than copying subtrees.

use crate::Result;
use crate::cursor::Cursor;
use crate::node::{Node, NodeError};
use crate::path::PathError;

/// An ordered, 0-indexed sequence of nodes.
///
/// Each position owns one node; resizing either truncates (dropping
/// trailing nodes) or extends with fresh Null nodes. Mutating positional
/// operations accept a negative index to mean "append a new slot, then
/// address it", which gives `arr[-1] = x` ergonomics to callers building
/// arrays incrementally.
#[derive(Debug, Clone, Default)]
pub struct NodeArray {
    items: Vec<Node>,
}

impl NodeArray {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an array over existing node handles.
    pub fn from_nodes(items: Vec<Node>) -> Self {
        Self { items }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Grows with Null nodes or truncates to `len` elements.
    pub fn resize(&mut self, len: usize) {
        if len < self.items.len() {
            self.items.truncate(len);
        } else {
            while self.items.len() < len {
                self.items.push(Node::new());
            }
        }
    }

    /// Read-only access by position. Fails with `IndexOutOfRange`.
    pub fn get(&self, idx: usize) -> Result<Node> {
        self.items.get(idx).cloned().ok_or_else(|| {
            NodeError::IndexOutOfRange {
                index: idx as isize,
                len: self.items.len(),
            }
            .into()
        })
    }

    /// Addresses position `idx`, or appends a new Null slot when `idx` is
    /// negative.
    pub fn at(&mut self, idx: isize) -> Result<Node> {
        if idx < 0 {
            Ok(self.push_back())
        } else {
            self.get(idx as usize)
        }
    }

    /// Inserts `node` before position `idx`, shifting later elements.
    /// A negative `idx` appends instead.
    pub fn insert(&mut self, idx: isize, node: Node) -> Result<Node> {
        if idx < 0 {
            return Ok(self.push_back_node(node));
        }
        let idx = idx as usize;
        if idx > self.items.len() {
            return Err(NodeError::IndexOutOfRange {
                index: idx as isize,
                len: self.items.len(),
            }
            .into());
        }
        self.items.insert(idx, node.clone());
        Ok(node)
    }

    /// Replaces the element at `idx`. A negative `idx` appends instead.
    pub fn update(&mut self, idx: isize, node: Node) -> Result<Node> {
        if idx < 0 {
            return Ok(self.push_back_node(node));
        }
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(idx as usize)
            .ok_or(NodeError::IndexOutOfRange { index: idx, len })?;
        *slot = node.clone();
        Ok(node)
    }

    /// Removes and returns the element at `idx`, shifting later elements.
    pub fn erase(&mut self, idx: usize) -> Result<Node> {
        if idx >= self.items.len() {
            return Err(NodeError::IndexOutOfRange {
                index: idx as isize,
                len: self.items.len(),
            }
            .into());
        }
        Ok(self.items.remove(idx))
    }

    /// Appends a fresh Null node and returns its handle.
    pub fn push_back(&mut self) -> Node {
        let node = Node::new();
        self.items.push(node.clone());
        node
    }

    /// Appends an existing node, transferring it into the array.
    pub fn push_back_node(&mut self, node: Node) -> Node {
        self.items.push(node.clone());
        node
    }

    /// Removes and returns the last element. Fails with `EmptyContainer`
    /// when the array is empty.
    pub fn pop_back(&mut self) -> Result<Node> {
        self.items.pop().ok_or_else(|| {
            NodeError::EmptyContainer {
                operation: "pop from".to_string(),
            }
            .into()
        })
    }

    /// Selects positions `start:stop:step` into a new array sharing the
    /// element handles, python slice semantics. `step` must be non-zero.
    pub fn slice(&self, start: isize, stop: isize, step: isize) -> Result<NodeArray> {
        if step == 0 {
            return Err(PathError::InvalidSlice { start, stop, step }.into());
        }
        let len = self.items.len() as isize;
        let clamp = |idx: isize, low: isize, high: isize| {
            let idx = if idx < 0 { idx + len } else { idx };
            idx.clamp(low, high)
        };

        let mut selected = Vec::new();
        if step > 0 {
            let begin = clamp(start, 0, len);
            let end = clamp(stop, 0, len);
            let mut i = begin;
            while i < end {
                selected.push(self.items[i as usize].clone());
                i += step;
            }
        } else {
            let begin = clamp(start, -1, len - 1);
            let end = clamp(stop, -1, len - 1);
            let mut i = begin;
            while i > end {
                selected.push(self.items[i as usize].clone());
                i += step;
            }
        }
        Ok(NodeArray { items: selected })
    }

    /// Cursor over the element handles, front to back.
    pub fn children(&self) -> Cursor<Node> {
        Cursor::from_iter(self.items.clone())
    }

    /// Plain iterator over the element handles.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.items.iter()
    }
}

impl PartialEq for NodeArray {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl FromIterator<Node> for NodeArray {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
