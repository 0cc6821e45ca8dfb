//! Error types for node operations.
//!
//! These cover typed reads against an incompatible alternative, read-only
//! addressing of missing entries, container misuse, and reference
//! resolution failures. Insert-or-get conveniences never report "not
//! found"; they only fail on a genuine kind conflict.

use thiserror::Error;

/// Structured error types for node and container operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NodeError {
    /// A value was read or written against an incompatible alternative.
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Read-only object addressing of a missing key.
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    /// Array addressing outside the valid index range.
    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    /// A removal was attempted on an empty array.
    #[error("cannot {operation} an empty container")]
    EmptyContainer { operation: String },

    /// A reference chain revisited a node already in the chain.
    #[error("cyclic reference detected after {depth} hops")]
    CyclicReference { depth: usize },
}

impl NodeError {
    /// Check if this error is a type mismatch.
    pub fn is_type_error(&self) -> bool {
        matches!(self, NodeError::TypeMismatch { .. })
    }

    /// Check if this error indicates a missing key or index.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NodeError::KeyNotFound { .. } | NodeError::IndexOutOfRange { .. }
        )
    }

    /// Check if this error is a reference resolution failure.
    pub fn is_cycle_error(&self) -> bool {
        matches!(self, NodeError::CyclicReference { .. })
    }

    /// Get the key if this is a key-related error.
    pub fn key(&self) -> Option<&str> {
        match self {
            NodeError::KeyNotFound { key } => Some(key),
            _ => None,
        }
    }
}

impl From<NodeError> for crate::Error {
    fn from(err: NodeError) -> Self {
        crate::Error::Node(err)
    }
}
