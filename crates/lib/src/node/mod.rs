//! The polymorphic node type and its tree operations.
//!
//! A [`Node`] is the single unit of data in the tree: a cheap-to-clone
//! handle over a cell holding one [`Value`] alternative. Clones alias the
//! same cell, which is what lets containers hand out entries, arrays share
//! sliced elements, and references redirect to live targets.
//!
//! Container alternatives come into existence lazily: the first Object or
//! Array operation on a Null node coerces it to the requested kind. A node
//! that already holds a different non-Null alternative never changes kind
//! implicitly; the operation fails with a type mismatch instead.
//!
//! # References
//!
//! A node may hold [`Value::Reference`], a redirection to another node.
//! Every structural entry point resolves the reference chain before acting,
//! so a reference-holding node is a transparent stand-in for its target.
//! Resolution tracks visited cells and rejects cycles instead of recursing
//! unboundedly. The local reference cell is only ever written by
//! [`Node::set_reference`], which installs or replaces the redirection.
//!
//! ```
//! use hdata::node::Node;
//!
//! let root = Node::new();
//! root.insert_path("D/E/F").unwrap().set("hello world!");
//! assert_eq!(
//!     root.get("D").unwrap().get("E").unwrap().get("F").unwrap()
//!         .get_as::<String>().unwrap(),
//!     "hello world!"
//! );
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::Result;
use crate::cursor::Cursor;
use crate::path::{Path, PathError, Segment};
use crate::value::{DataBlock, Value, ValueType};

pub mod array;
pub mod errors;
pub mod json;
pub mod object;


pub use array::NodeArray;
pub use errors::NodeError;
pub use object::NodeObject;

/// Hard ceiling on reference chain length, a backstop for chains built
/// from distinct cells that a visited check alone would walk for a long
/// time.
const MAX_REFERENCE_DEPTH: usize = 64;

/// A shared handle to one node cell.
///
/// `Node` is the unit of data of the tree. It holds exactly one [`Value`]
/// alternative at a time; switching alternatives is an explicit mutation
/// (`clear`, `set`, the container coercions). Handles are cheap to clone
/// and clones alias the same cell.
#[derive(Clone, Default)]
pub struct Node(Rc<RefCell<Value>>);

/// A non-owning handle to a node cell, used for owner back-references so
/// that containers do not keep their owning node alive.
#[derive(Clone, Default)]
pub struct WeakNode(Weak<RefCell<Value>>);

impl WeakNode {
    /// Recovers a usable handle if the owning node is still alive.
    pub fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(Node)
    }
}

impl fmt::Debug for WeakNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakNode").finish()
    }
}

impl Node {
    /// Creates a fresh Null node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a node holding `value`.
    pub fn with(value: impl Into<Value>) -> Self {
        Node(Rc::new(RefCell::new(value.into())))
    }

    /// Downgrades to a non-owning handle.
    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.0))
    }

    /// Returns true if both handles alias the same cell.
    pub fn ptr_eq(a: &Node, b: &Node) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Stable identity of the underlying cell, used by cycle guards.
    pub(crate) fn cell_id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    // ----- references ---------------------------------------------------

    /// Follows the reference chain to its non-Reference terminal.
    ///
    /// A node that holds anything but a Reference resolves to itself. Fails
    /// with `CyclicReference` when the chain revisits a cell, and bounds
    /// the chain length as a backstop.
    pub fn resolve(&self) -> Result<Node> {
        let mut visited: Vec<*const RefCell<Value>> = Vec::new();
        let mut current = self.clone();
        loop {
            let next = match &*current.0.borrow() {
                Value::Reference(target) => target.clone(),
                _ => return Ok(current.clone()),
            };
            let cell = Rc::as_ptr(&current.0);
            if visited.iter().any(|seen| *seen == cell) || visited.len() >= MAX_REFERENCE_DEPTH {
                return Err(NodeError::CyclicReference {
                    depth: visited.len(),
                }
                .into());
            }
            visited.push(cell);
            current = next;
        }
    }

    /// Installs or replaces a redirection to `target`.
    ///
    /// This is the one mutation applied to the local cell of a node that
    /// already holds a Reference; everything else forwards to the resolved
    /// target.
    pub fn set_reference(&self, target: &Node) {
        *self.0.borrow_mut() = Value::Reference(target.clone());
    }

    /// Returns true if the local cell holds a Reference.
    pub fn is_reference(&self) -> bool {
        self.0.borrow().is_reference()
    }

    // ----- value access -------------------------------------------------

    /// Returns the tag of the resolved alternative.
    ///
    /// An unresolvable (cyclic) chain reports `ValueType::Reference`, the
    /// raw tag of the local cell.
    pub fn value_type(&self) -> ValueType {
        match self.resolve() {
            Ok(node) => node.0.borrow().value_type(),
            Err(_) => ValueType::Reference,
        }
    }

    /// Returns true if the resolved alternative is Null.
    pub fn is_null(&self) -> bool {
        self.value_type() == ValueType::Null
    }

    /// Resets the resolved target to Null.
    ///
    /// When the reference chain cannot be resolved the local cell is reset
    /// instead, which breaks the chain.
    pub fn clear(&self) {
        let target = self.resolve().unwrap_or_else(|_| self.clone());
        *target.0.borrow_mut() = Value::Null;
    }

    /// Replaces the resolved target's alternative with `value`.
    ///
    /// The replacement is atomic from the caller's point of view: the cell
    /// switches from the old alternative to the new one in a single store.
    pub fn set(&self, value: impl Into<Value>) {
        let target = self.resolve().unwrap_or_else(|_| self.clone());
        *target.0.borrow_mut() = value.into();
    }

    /// Returns a clone of the resolved value.
    ///
    /// Container alternatives clone shallowly (entry handles are shared);
    /// use [`Node::deep_copy`] to materialize an independent subtree.
    pub fn value(&self) -> Result<Value> {
        Ok(self.resolve()?.0.borrow().clone())
    }

    /// Typed scalar read with widening conversions.
    ///
    /// Numeric alternatives widen (`Int` reads as `i64` or `f64`); reads
    /// that would narrow or truncate fail with `TypeMismatch`. Numeric
    /// scalars read as `String` through their display form, and text reads
    /// as a numeric type when its content parses.
    pub fn get_as<T>(&self) -> Result<T>
    where
        T: for<'a> TryFrom<&'a Value, Error = NodeError>,
    {
        let resolved = self.resolve()?;
        let value = resolved.0.borrow();
        T::try_from(&value).map_err(Into::into)
    }

    // ----- container coercion -------------------------------------------

    /// Coerces the resolved target into an Object, returning its handle.
    ///
    /// A Null target becomes an empty default in-memory object; a target
    /// that already is an Object is returned as-is; anything else fails
    /// with `TypeMismatch`.
    pub fn as_object(&self) -> Result<Node> {
        let target = self.resolve()?;
        {
            let mut cell = target.0.borrow_mut();
            match &mut *cell {
                Value::Object(_) => {}
                Value::Null => {
                    let mut backend = crate::backend::default_backend();
                    backend.bind_owner(&target);
                    *cell = Value::Object(backend);
                }
                other => {
                    return Err(NodeError::TypeMismatch {
                        expected: "object".to_string(),
                        actual: other.type_name().to_string(),
                    }
                    .into());
                }
            }
        }
        Ok(target)
    }

    /// Coerces the resolved target into an Array, returning its handle.
    pub fn as_array(&self) -> Result<Node> {
        let target = self.resolve()?;
        {
            let mut cell = target.0.borrow_mut();
            match &mut *cell {
                Value::Array(_) => {}
                Value::Null => *cell = Value::Array(NodeArray::new()),
                other => {
                    return Err(NodeError::TypeMismatch {
                        expected: "array".to_string(),
                        actual: other.type_name().to_string(),
                    }
                    .into());
                }
            }
        }
        Ok(target)
    }

    /// Coerces the resolved target into a Block and returns a copy of it.
    ///
    /// A Null target becomes an empty block. Blocks are immutable values:
    /// replacing the payload means installing a whole new block with
    /// [`Node::set_block`].
    pub fn as_block(&self) -> Result<DataBlock> {
        let target = self.resolve()?;
        let mut cell = target.0.borrow_mut();
        match &mut *cell {
            Value::Block(block) => Ok(block.clone()),
            Value::Null => {
                let block = DataBlock::new();
                *cell = Value::Block(block.clone());
                Ok(block)
            }
            other => Err(NodeError::TypeMismatch {
                expected: "block".to_string(),
                actual: other.type_name().to_string(),
            }
            .into()),
        }
    }

    /// Installs a new block payload on the resolved target.
    pub fn set_block(&self, block: DataBlock) {
        self.set(Value::Block(block));
    }

    /// Constructs a storage backend for `request` and installs it as this
    /// node's Object alternative.
    ///
    /// The backend is selected through the process-wide registry by the
    /// schema embedded in the request string; an empty request selects the
    /// default in-memory backend. Only legal on a Null target.
    pub fn attach_backend(&self, request: &str) -> Result<Node> {
        let target = self.resolve()?;
        {
            let mut cell = target.0.borrow_mut();
            if !cell.is_null() {
                return Err(NodeError::TypeMismatch {
                    expected: "null".to_string(),
                    actual: cell.type_name().to_string(),
                }
                .into());
            }
            let mut backend = crate::backend::create(request)?;
            backend.bind_owner(&target);
            *cell = Value::Object(backend);
        }
        Ok(target)
    }

    // ----- object surface -----------------------------------------------

    /// Insert-or-get: the entry under `key`, created as Null when absent.
    ///
    /// Coerces a Null node into an Object. Never fails on a duplicate key,
    /// only on a kind conflict.
    pub fn insert(&self, key: &str) -> Result<Node> {
        let target = self.as_object()?;
        let mut cell = target.0.borrow_mut();
        let object = cell.as_object_mut().expect("coerced to object");
        Ok(object.entry(key))
    }

    /// Read-only lookup of `key`. Fails with `KeyNotFound` when absent,
    /// also on a Null node (which has no entries).
    pub fn get(&self, key: &str) -> Result<Node> {
        let target = self.resolve()?;
        let cell = target.0.borrow();
        match &*cell {
            Value::Object(object) => object.find(key),
            Value::Null => Err(NodeError::KeyNotFound {
                key: key.to_string(),
            }
            .into()),
            other => Err(NodeError::TypeMismatch {
                expected: "object".to_string(),
                actual: other.type_name().to_string(),
            }
            .into()),
        }
    }

    /// Removes the entry under `key`. Removing an absent key (or erasing on
    /// a Null node) is a no-op success.
    pub fn erase(&self, key: &str) -> Result<()> {
        let target = self.resolve()?;
        let mut cell = target.0.borrow_mut();
        match &mut *cell {
            Value::Object(object) => {
                object.remove(key);
                Ok(())
            }
            Value::Null => Ok(()),
            other => Err(NodeError::TypeMismatch {
                expected: "object".to_string(),
                actual: other.type_name().to_string(),
            }
            .into()),
        }
    }

    /// Returns true if the resolved node is an Object with an entry under
    /// `key`.
    pub fn contains(&self, key: &str) -> bool {
        let Ok(target) = self.resolve() else {
            return false;
        };
        let cell = target.0.borrow();
        cell.as_object().is_some_and(|object| object.contains(key))
    }

    /// Container size: entry count for an Object, element count for an
    /// Array, 0 for Null, 1 for any leaf.
    pub fn count(&self) -> usize {
        let Ok(target) = self.resolve() else {
            return 0;
        };
        let cell = target.0.borrow();
        match &*cell {
            Value::Object(object) => object.len(),
            Value::Array(array) => array.len(),
            Value::Null => 0,
            _ => 1,
        }
    }

    /// Cursor over the child nodes of a container; empty for anything else.
    pub fn children(&self) -> Cursor<Node> {
        let Ok(target) = self.resolve() else {
            return Cursor::empty();
        };
        let cell = target.0.borrow();
        match &*cell {
            Value::Object(object) => object.children(),
            Value::Array(array) => array.children(),
            _ => Cursor::empty(),
        }
    }

    /// Cursor over (key, value) pairs of an Object; empty for anything else.
    pub fn kv_items(&self) -> Cursor<(String, Node)> {
        let Ok(target) = self.resolve() else {
            return Cursor::empty();
        };
        let cell = target.0.borrow();
        match &*cell {
            Value::Object(object) => object.kv_items(),
            _ => Cursor::empty(),
        }
    }

    // ----- array surface ------------------------------------------------

    /// Resizes the array, coercing a Null node first. Growth pads with
    /// Null nodes, shrinking truncates.
    pub fn resize(&self, len: usize) -> Result<()> {
        let target = self.as_array()?;
        let mut cell = target.0.borrow_mut();
        cell.as_array_mut().expect("coerced to array").resize(len);
        Ok(())
    }

    /// Appends a fresh Null element and returns its handle.
    pub fn push_back(&self) -> Result<Node> {
        let target = self.as_array()?;
        let mut cell = target.0.borrow_mut();
        Ok(cell.as_array_mut().expect("coerced to array").push_back())
    }

    /// Appends an existing node.
    pub fn push_back_node(&self, node: Node) -> Result<Node> {
        let target = self.as_array()?;
        let mut cell = target.0.borrow_mut();
        Ok(cell
            .as_array_mut()
            .expect("coerced to array")
            .push_back_node(node))
    }

    /// Removes and returns the last element. Fails with `EmptyContainer`
    /// on an empty array.
    pub fn pop_back(&self) -> Result<Node> {
        let target = self.as_array()?;
        let mut cell = target.0.borrow_mut();
        cell.as_array_mut().expect("coerced to array").pop_back()
    }

    /// Addresses element `idx`, appending a new slot when `idx` is
    /// negative. Coerces a Null node into an Array.
    pub fn at(&self, idx: isize) -> Result<Node> {
        let target = self.as_array()?;
        let mut cell = target.0.borrow_mut();
        cell.as_array_mut().expect("coerced to array").at(idx)
    }

    /// Inserts `node` before position `idx` (appends when negative).
    pub fn insert_at(&self, idx: isize, node: Node) -> Result<Node> {
        let target = self.as_array()?;
        let mut cell = target.0.borrow_mut();
        cell.as_array_mut()
            .expect("coerced to array")
            .insert(idx, node)
    }

    /// Replaces the element at `idx` (appends when negative).
    pub fn update_at(&self, idx: isize, node: Node) -> Result<Node> {
        let target = self.as_array()?;
        let mut cell = target.0.borrow_mut();
        cell.as_array_mut()
            .expect("coerced to array")
            .update(idx, node)
    }

    /// Removes the element at `idx`, shifting later elements.
    pub fn erase_at(&self, idx: usize) -> Result<Node> {
        let target = self.as_array()?;
        let mut cell = target.0.borrow_mut();
        cell.as_array_mut().expect("coerced to array").erase(idx)
    }

    /// Selects `start:stop:step` into a new Array node sharing the element
    /// handles.
    pub fn slice(&self, start: isize, stop: isize, step: isize) -> Result<Node> {
        let target = self.resolve()?;
        let cell = target.0.borrow();
        match &*cell {
            Value::Array(array) => Ok(Node::with(array.slice(start, stop, step)?)),
            other => Err(NodeError::TypeMismatch {
                expected: "array".to_string(),
                actual: other.type_name().to_string(),
            }
            .into()),
        }
    }

    // ----- path operations ----------------------------------------------

    /// Descend-or-create along `path`, returning the addressed node.
    ///
    /// Null nodes along the way coerce to the kind the segment requires
    /// (key segments make Objects, index segments make Arrays, and an
    /// index beyond the current length grows the array). An existing
    /// non-Null node of the wrong kind fails with a kind conflict and no
    /// repair is attempted.
    pub fn insert_path(&self, path: impl Into<Path>) -> Result<Node> {
        let path = path.into();
        let mut current = self.clone();
        for segment in path.segments() {
            current = current.step_create(segment)?;
        }
        Ok(current)
    }

    /// Read-only resolution of `path`. Fails on the first missing segment
    /// with `KeyNotFound` or `IndexOutOfRange`.
    pub fn get_path(&self, path: impl Into<Path>) -> Result<Node> {
        let path = path.into();
        let mut current = self.clone();
        for segment in path.segments() {
            current = current.step_read(segment)?;
        }
        Ok(current)
    }

    /// Removes the entry addressed by `path`.
    ///
    /// All intermediate segments must resolve; a missing intermediate is an
    /// error. A missing final key is a no-op success, matching single-key
    /// erase.
    pub fn erase_path(&self, path: impl Into<Path>) -> Result<()> {
        let path = path.into();
        let (parent, last) = path.split_last()?;
        let parent_node = self.get_path(&parent)?;
        match last {
            Segment::Key(key) => parent_node.erase(key),
            Segment::Index(idx) => {
                if *idx < 0 {
                    return Err(NodeError::IndexOutOfRange {
                        index: *idx,
                        len: parent_node.count(),
                    }
                    .into());
                }
                parent_node.erase_at(*idx as usize).map(|_| ())
            }
            Segment::Slice { .. } => Err(PathError::UnsupportedSegment {
                segment: last.to_string(),
                operation: "erase".to_string(),
            }
            .into()),
        }
    }

    /// One descend-or-create step.
    fn step_create(&self, segment: &Segment) -> Result<Node> {
        let target = self.resolve()?;
        let kind = target.0.borrow().value_type();
        match segment {
            Segment::Key(key) => match kind {
                ValueType::Null | ValueType::Object => target.insert(key),
                // A numeric-looking key addresses an index when the node
                // already is an array.
                ValueType::Array => match segment.index_hint() {
                    Some(idx) => target.step_array_create(idx),
                    None => Err(PathError::KindConflict {
                        segment: segment.to_string(),
                        found: kind.name().to_string(),
                    }
                    .into()),
                },
                _ => Err(PathError::KindConflict {
                    segment: segment.to_string(),
                    found: kind.name().to_string(),
                }
                .into()),
            },
            Segment::Index(idx) => match kind {
                ValueType::Null | ValueType::Array => target.step_array_create(*idx),
                _ => Err(PathError::KindConflict {
                    segment: segment.to_string(),
                    found: kind.name().to_string(),
                }
                .into()),
            },
            Segment::Slice { .. } => Err(PathError::UnsupportedSegment {
                segment: segment.to_string(),
                operation: "insert".to_string(),
            }
            .into()),
        }
    }

    /// Index step of a descend-or-create walk: appends on a negative
    /// index, grows the array when the index is past the end.
    fn step_array_create(&self, idx: isize) -> Result<Node> {
        let target = self.as_array()?;
        let mut cell = target.0.borrow_mut();
        let array = cell.as_array_mut().expect("coerced to array");
        if idx >= 0 && idx as usize >= array.len() {
            array.resize(idx as usize + 1);
        }
        array.at(idx)
    }

    /// One read-only step.
    fn step_read(&self, segment: &Segment) -> Result<Node> {
        let target = self.resolve()?;
        let cell = target.0.borrow();
        match (segment, &*cell) {
            (Segment::Key(key), Value::Object(object)) => object.find(key),
            (Segment::Key(key), Value::Array(array)) => match segment.index_hint() {
                Some(idx) => array_read(array, idx),
                None => Err(PathError::KindConflict {
                    segment: key.clone(),
                    found: "array".to_string(),
                }
                .into()),
            },
            (Segment::Key(key), Value::Null) => Err(NodeError::KeyNotFound { key: key.clone() }.into()),
            (Segment::Index(idx), Value::Array(array)) => array_read(array, *idx),
            (Segment::Index(idx), Value::Null) => Err(NodeError::IndexOutOfRange {
                index: *idx,
                len: 0,
            }
            .into()),
            (Segment::Slice { start, stop, step }, Value::Array(array)) => {
                Ok(Node::with(array.slice(*start, *stop, *step)?))
            }
            (_, other) => Err(PathError::KindConflict {
                segment: segment.to_string(),
                found: other.type_name().to_string(),
            }
            .into()),
        }
    }

    // ----- copy, update, merge, fetch -----------------------------------

    /// Materializes an independent deep copy of the resolved subtree.
    ///
    /// Objects are copied into fresh default backends regardless of the
    /// source backend; references are copied as redirections (the copy
    /// points at the same target).
    pub fn deep_copy(&self) -> Result<Node> {
        let target = self.resolve()?;
        let cell = target.0.borrow();
        match &*cell {
            Value::Object(object) => {
                let copy = Node::new();
                let items: Vec<(String, Node)> = object.kv_items().collect();
                drop(cell);
                for (key, child) in items {
                    let child_copy = child.deep_copy()?;
                    copy.insert(&key)?.set(child_copy.value()?);
                }
                Ok(copy)
            }
            Value::Array(array) => {
                let items: Vec<Node> = array.iter().cloned().collect();
                drop(cell);
                let copy = Node::new();
                copy.resize(0)?;
                for child in items {
                    let child_copy = child.deep_copy()?;
                    copy.push_back_node(child_copy)?;
                }
                Ok(copy)
            }
            other => Ok(Node::with(other.clone())),
        }
    }

    /// Path-addressed assignment: descend-or-create to the addressed node,
    /// then replace it with a deep copy of `patch`.
    pub fn update(&self, path: impl Into<Path>, patch: &Node) -> Result<Node> {
        let target = self.insert_path(path)?;
        let copy = patch.deep_copy()?;
        target.set(copy.value()?);
        Ok(target)
    }

    /// Path-addressed recursive merge, returning the merged node.
    ///
    /// Objects merge key-wise (patch keys recurse into matching container
    /// entries, otherwise overwrite), arrays merge per
    /// [`MergeOptions::array_policy`], and scalars are overwritten by the
    /// patch.
    pub fn merge(
        &self,
        path: impl Into<Path>,
        patch: &Node,
        options: &MergeOptions,
    ) -> Result<Node> {
        let target = self.insert_path(path)?;
        trace!(kind = %target.value_type(), "merging patch");
        merge_into(&target, patch, options)?;
        Ok(target)
    }

    /// Read-only projection of the node addressed by `path`.
    ///
    /// A Null projection behaves as a deep-copy get. An Object or Array
    /// projection copies only the requested keys or indices, recursively;
    /// requested entries missing from the data are skipped. Anything else
    /// as projection also behaves as a plain get.
    pub fn fetch(&self, path: impl Into<Path>, projection: &Node) -> Result<Node> {
        let target = self.get_path(path)?;
        project(&target, projection)
    }

    // ----- bulk query ---------------------------------------------------

    /// Lazy depth-first preorder sequence of the subtree nodes matching
    /// `predicate`, the node itself included. The traversal does not
    /// descend through references.
    pub fn find<P>(&self, predicate: P) -> Cursor<Node>
    where
        P: Fn(&Node) -> bool + 'static,
    {
        Cursor::from_iter(DfsIter {
            stack: vec![self.clone()],
        })
        .filter(move |node| predicate(node))
    }

    /// Replaces every node of `range` with a deep copy of `patch`,
    /// best-effort, in traversal order. Returns how many elements
    /// succeeded; one element's failure does not roll back the others.
    pub fn update_range(range: Cursor<Node>, patch: &Node) -> usize {
        let mut updated = 0;
        for node in range {
            let assigned = node.resolve().and_then(|target| {
                let copy = patch.deep_copy()?;
                target.set(copy.value()?);
                Ok(())
            });
            if assigned.is_ok() {
                updated += 1;
            }
        }
        trace!(updated, "bulk update applied");
        updated
    }

    /// Clears every node of `range` to Null, in traversal order. Returns
    /// how many elements were cleared.
    ///
    /// Range members carry no back-pointer to their owning container
    /// entry, so removal means resetting the node, not unlinking it; use
    /// [`Node::erase_path`] for structural unlinking.
    pub fn remove_range(range: Cursor<Node>) -> usize {
        let mut removed = 0;
        for node in range {
            node.clear();
            removed += 1;
        }
        trace!(removed, "bulk remove applied");
        removed
    }
}

/// Array read with from-the-end semantics for negative indices.
fn array_read(array: &NodeArray, idx: isize) -> Result<Node> {
    let len = array.len() as isize;
    let effective = if idx < 0 { idx + len } else { idx };
    if effective < 0 || effective >= len {
        return Err(NodeError::IndexOutOfRange {
            index: idx,
            len: array.len(),
        }
        .into());
    }
    array.get(effective as usize)
}

/// How array entries combine during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayMergePolicy {
    /// Patch elements are appended after the existing elements.
    #[default]
    Append,
    /// Patch element `i` merges into existing element `i`, growing the
    /// array when the patch is longer.
    OverwriteByIndex,
}

/// Options controlling [`Node::merge`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    pub array_policy: ArrayMergePolicy,
}

/// Recursive merge of `patch` into `target`.
fn merge_into(target: &Node, patch: &Node, options: &MergeOptions) -> Result<()> {
    let patch_kind = patch.value_type();
    let target_kind = target.value_type();
    match (target_kind, patch_kind) {
        (ValueType::Object, ValueType::Object) => {
            let items: Vec<(String, Node)> = patch.kv_items().collect();
            for (key, patch_child) in items {
                let entry = target.insert(&key)?;
                merge_into(&entry, &patch_child, options)?;
            }
            Ok(())
        }
        (ValueType::Array, ValueType::Array) => {
            let patch_items: Vec<Node> = patch.children().collect();
            match options.array_policy {
                ArrayMergePolicy::Append => {
                    for patch_child in patch_items {
                        target.push_back_node(patch_child.deep_copy()?)?;
                    }
                }
                ArrayMergePolicy::OverwriteByIndex => {
                    for (idx, patch_child) in patch_items.into_iter().enumerate() {
                        let entry = target.step_array_create(idx as isize)?;
                        merge_into(&entry, &patch_child, options)?;
                    }
                }
            }
            Ok(())
        }
        // Anything else is an overwrite: the patch wins, Null targets
        // adopt the patch wholesale.
        _ => {
            let copy = patch.deep_copy()?;
            target.set(copy.value()?);
            Ok(())
        }
    }
}

/// Copies the parts of `node` selected by `projection`.
fn project(node: &Node, projection: &Node) -> Result<Node> {
    match projection.value_type() {
        ValueType::Object => {
            let result = Node::new();
            let wanted: Vec<(String, Node)> = projection.kv_items().collect();
            for (key, sub_projection) in wanted {
                match node.get(&key) {
                    Ok(child) => {
                        let projected = project(&child, &sub_projection)?;
                        result.insert(&key)?.set(projected.value()?);
                    }
                    // Requested entries missing from the data are skipped.
                    Err(_) => continue,
                }
            }
            Ok(result)
        }
        ValueType::Array => {
            let result = Node::new();
            result.resize(0)?;
            let wanted: Vec<Node> = projection.children().collect();
            for (idx, sub_projection) in wanted.into_iter().enumerate() {
                let Ok(child) = node.at_read(idx) else {
                    continue;
                };
                let projected = project(&child, &sub_projection)?;
                result.push_back_node(projected)?;
            }
            Ok(result)
        }
        _ => node.deep_copy(),
    }
}

impl Node {
    /// Read-only element access used by projections.
    fn at_read(&self, idx: usize) -> Result<Node> {
        let target = self.resolve()?;
        let cell = target.0.borrow();
        match &*cell {
            Value::Array(array) => array.get(idx),
            other => Err(NodeError::TypeMismatch {
                expected: "array".to_string(),
                actual: other.type_name().to_string(),
            }
            .into()),
        }
    }
}

/// Depth-first preorder iterator over a subtree, used by [`Node::find`].
struct DfsIter {
    stack: Vec<Node>,
}

impl Iterator for DfsIter {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        let node = self.stack.pop()?;
        // Do not descend through references; their targets live elsewhere.
        if !node.is_reference() {
            let mut children: Vec<Node> = node.children().collect();
            children.reverse();
            self.stack.extend(children);
        }
        Some(node)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        if Node::ptr_eq(self, other) {
            return true;
        }
        match (self.value(), other.value()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq<Value> for Node {
    fn eq(&self, other: &Value) -> bool {
        match self.value() {
            Ok(value) => value == *other,
            Err(_) => false,
        }
    }
}

macro_rules! impl_node_scalar_eq {
    ($($ty:ty),*) => {
        $(
            impl PartialEq<$ty> for Node {
                fn eq(&self, other: &$ty) -> bool {
                    match self.value() {
                        Ok(value) => value == *other,
                        Err(_) => false,
                    }
                }
            }
        )*
    };
}

impl_node_scalar_eq!(bool, i32, i64, f64, &str, String);

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolve() {
            Ok(node) => write!(f, "Node({:?})", node.0.borrow()),
            Err(_) => write!(f, "Node(<cyclic reference>)"),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut on_stack = Vec::new();
        fmt_indented(f, self, 0, &mut on_stack)
    }
}

const INDENT_WIDTH: usize = 4;

/// Recursive diagnostic rendering: objects as `{ "key": value, ... }`,
/// arrays as `[ value, ... ]`, indentation proportional to depth. Cycles
/// through references render a marker instead of recursing.
fn fmt_indented(
    f: &mut fmt::Formatter<'_>,
    node: &Node,
    depth: usize,
    on_stack: &mut Vec<*const RefCell<Value>>,
) -> fmt::Result {
    let Ok(target) = node.resolve() else {
        return write!(f, "<cyclic reference>");
    };
    let cell_ptr = Rc::as_ptr(&target.0);
    if on_stack.contains(&cell_ptr) {
        return write!(f, "<...>");
    }

    let pad = " ".repeat((depth + 1) * INDENT_WIDTH);
    let close_pad = " ".repeat(depth * INDENT_WIDTH);
    let cell = target.0.borrow();
    match &*cell {
        Value::Object(object) => {
            on_stack.push(cell_ptr);
            let items: Vec<(String, Node)> = object.kv_items().collect();
            drop(cell);
            writeln!(f, "{{")?;
            for (key, child) in items {
                write!(f, "{pad}\"{key}\": ")?;
                fmt_indented(f, &child, depth + 1, on_stack)?;
                writeln!(f, ",")?;
            }
            write!(f, "{close_pad}}}")?;
            on_stack.pop();
            Ok(())
        }
        Value::Array(array) => {
            on_stack.push(cell_ptr);
            let items: Vec<Node> = array.iter().cloned().collect();
            drop(cell);
            writeln!(f, "[")?;
            for child in items {
                write!(f, "{pad}")?;
                fmt_indented(f, &child, depth + 1, on_stack)?;
                writeln!(f, ",")?;
            }
            write!(f, "{close_pad}]")?;
            on_stack.pop();
            Ok(())
        }
        Value::Text(text) => write!(f, "\"{text}\""),
        other => write!(f, "{other}"),
    }
}
