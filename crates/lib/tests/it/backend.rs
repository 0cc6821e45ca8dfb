//! Registry behavior and backend selection by request string.

use std::any::Any;
use std::cell::RefCell;

use hdata::Result;
use hdata::backend::{self, InMemoryObject};
use hdata::cursor::Cursor;
use hdata::node::{Node, NodeObject, WeakNode};
use hdata::value::ValueType;

/// A minimal out-of-crate backend: in-memory storage that records how many
/// lookups it served, the shape a caching adapter for an external store
/// would take.
#[derive(Debug, Default)]
struct CountingObject {
    inner: InMemoryObject,
    lookups: RefCell<usize>,
}

impl CountingObject {
    fn new() -> Self {
        Self::default()
    }

    fn lookups(&self) -> usize {
        *self.lookups.borrow()
    }
}

impl NodeObject for CountingObject {
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }

    fn entry(&mut self, key: &str) -> Node {
        self.inner.entry(key)
    }

    fn find(&self, key: &str) -> Result<Node> {
        *self.lookups.borrow_mut() += 1;
        self.inner.find(key)
    }

    fn remove(&mut self, key: &str) -> Option<Node> {
        self.inner.remove(key)
    }

    fn children(&self) -> Cursor<Node> {
        self.inner.children()
    }

    fn kv_items(&self) -> Cursor<(String, Node)> {
        self.inner.kv_items()
    }

    fn bind_owner(&mut self, owner: &Node) {
        self.inner.bind_owner(owner);
    }

    fn owner(&self) -> Option<Node> {
        self.inner.owner()
    }

    fn boxed_clone(&self) -> Box<dyn NodeObject> {
        let mut inner = InMemoryObject::new();
        for (key, node) in self.inner.kv_items() {
            inner.insert_node(key, node);
        }
        Box::new(CountingObject {
            inner,
            lookups: RefCell::new(self.lookups()),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// Plugin-style self-registration: the backend plugs in at process start
// without the core knowing about it.
#[ctor::ctor]
fn register_counting_backend() {
    backend::register("counting", || Box::new(CountingObject::new()));
}

#[test]
fn test_unknown_schema_fails() {
    let node = Node::new();
    let err = node.attach_backend("bogus://x").unwrap_err();
    assert!(err.is_backend_not_found());
    // The node is left untouched by the failed attach.
    assert!(node.is_null());
}

#[test]
fn test_network_schemes_are_unsupported() {
    let node = Node::new();
    let err = node.attach_backend("https://example.org/doc").unwrap_err();
    assert!(err.is_backend_error());
    assert!(!err.is_backend_not_found());
}

#[test]
fn test_empty_request_selects_default_backend() {
    let node = Node::new();
    node.attach_backend("").unwrap();
    assert_eq!(node.value_type(), ValueType::Object);
    node.insert("k").unwrap().set(1);
    assert_eq!(node.count(), 1);
}

#[test]
fn test_registered_backend_by_schema_prefix() {
    let node = Node::new();
    node.attach_backend("counting:whatever/else").unwrap();

    node.insert("k").unwrap().set(1);
    assert_eq!(node.get("k").unwrap().get_as::<i32>().unwrap(), 1);
    assert_eq!(node.get("k").unwrap().get_as::<i32>().unwrap(), 1);

    // Downcast through the trait object to reach the concrete backend.
    let value = node.value().unwrap();
    let object = value.as_object().unwrap();
    let counting = object
        .as_any()
        .downcast_ref::<CountingObject>()
        .expect("counting backend");
    assert_eq!(counting.lookups(), 2);
}

#[test]
fn test_attach_on_non_null_fails() {
    let node = Node::with(5);
    let err = node.attach_backend("counting:x").unwrap_err();
    assert!(err.is_type_error());
    assert_eq!(node.get_as::<i32>().unwrap(), 5);
}

#[test]
fn test_attach_through_reference_mutates_target() {
    let target = Node::new();
    let alias = Node::new();
    alias.set_reference(&target);

    alias.attach_backend("counting:x").unwrap();
    assert_eq!(target.value_type(), ValueType::Object);
    assert!(alias.is_reference());
}

#[test]
fn test_extension_like_schema_suffix() {
    // "config.counting" has no ':', so the suffix after the last '.' is
    // the schema.
    let node = Node::new();
    node.attach_backend("config.counting").unwrap();
    assert_eq!(node.value_type(), ValueType::Object);
}

#[test]
fn test_registry_first_registration_wins() {
    assert!(backend::register("it-dup", || Box::new(InMemoryObject::new())));
    assert!(!backend::register("it-dup", || Box::new(InMemoryObject::new())));
    assert!(backend::registry().contains("it-dup"));
}

// WeakNode is part of the backend-facing surface; make sure an unbound
// owner behaves.
#[test]
fn test_weak_owner_default_is_unbound() {
    let weak = WeakNode::default();
    assert!(weak.upgrade().is_none());
}
