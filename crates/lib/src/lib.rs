//!
//! hdata: a hierarchical, backend-agnostic data model.
//! This library provides the in-process data layer used to address, proxy,
//! and federate tree-shaped scientific data across heterogeneous physical
//! stores.
//!
//! ## Core Concepts
//!
//! * **Nodes (`node::Node`)**: The single polymorphic unit of data. A node
//!   holds one alternative of the value model at a time: a scalar, a binary
//!   block, an ordered array, a string-keyed object, a stored path, or a
//!   reference redirecting to another node.
//! * **Values (`value::Value`)**: The closed set of alternatives a node can
//!   hold, with widening-only typed reads.
//! * **Objects and Arrays (`node::NodeObject`, `node::NodeArray`)**: The
//!   container capabilities. Objects are open: concrete storage comes from
//!   a pluggable backend.
//! * **Backends (`backend`)**: A process-wide registry maps schema names to
//!   backend constructors, selected at runtime from a request string. This
//!   is how file formats and experiment databases are composed under one
//!   tree API.
//! * **Paths (`path::Path`)**: Ordered key/index/slice segments used to
//!   address locations in a tree, parsed from `/`-delimited literals.
//! * **Cursors (`cursor::Cursor`)**: Lazy, forward-only traversal over
//!   container contents without materializing intermediate collections.
//!
//! ```
//! use hdata::Node;
//!
//! let entry = Node::new();
//! entry.insert_path("B/b").unwrap().set(1);
//! entry.insert_path("B/c").unwrap().set("hello world");
//!
//! assert_eq!(entry.get_path("B/b").unwrap().get_as::<i32>().unwrap(), 1);
//! assert_eq!(entry.count(), 1);
//! ```

pub mod backend;
pub mod cursor;
pub mod node;
pub mod path;
pub mod value;

/// Re-export the primary types for easier access.
pub use cursor::Cursor;
pub use node::{Node, NodeArray, NodeObject};
pub use path::Path;
pub use value::Value;

/// Result type used throughout the hdata library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the hdata library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured node and container errors from the node module
    #[error(transparent)]
    Node(node::NodeError),

    /// Structured path errors from the path module
    #[error(transparent)]
    Path(path::PathError),

    /// Structured backend selection errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Node(_) => "node",
            Error::Path(_) => "path",
            Error::Backend(_) => "backend",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a missing key or index.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Node(node_err) => node_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is a type mismatch.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Node(node_err) => node_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error is a reference resolution failure.
    pub fn is_cycle_error(&self) -> bool {
        match self {
            Error::Node(node_err) => node_err.is_cycle_error(),
            _ => false,
        }
    }

    /// Check if this error is a path kind conflict or malformed segment.
    pub fn is_path_error(&self) -> bool {
        matches!(self, Error::Path(_))
    }

    /// Check if this error indicates an unregistered backend schema.
    pub fn is_backend_not_found(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is backend-related.
    pub fn is_backend_error(&self) -> bool {
        matches!(self, Error::Backend(_))
    }
}
