//! Path addressing for hierarchical data trees.
//!
//! A [`Path`] is an immutable, ordered sequence of [`Segment`]s, each one a
//! string key, an integer index, or a slice. Paths are parsed from
//! `/`-delimited literals (`"D/E/F"` is three key segments) or built
//! programmatically, and are used both as addresses and as stored values
//! (a node can hold a path for symbolic linking).
//!
//! # Numeric-looking segments
//!
//! A literal segment such as `"2"` is ambiguous: it could be the object key
//! `"2"` or the array index `2`. The parser always produces key segments;
//! resolution treats a numeric-looking key as an index only when the node
//! it is applied to is already an array. Programmatically built
//! [`Segment::Index`] and [`Segment::Slice`] segments always carry array
//! semantics.
//!
//! ```
//! use hdata::path::Path;
//!
//! let path = Path::parse("D/E/F");
//! assert_eq!(path.len(), 3);
//!
//! let path = Path::new().key("equilibrium").index(2).key("boundary");
//! assert_eq!(path.to_string(), "equilibrium/2/boundary");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delimiter between segments in a path literal.
pub const PATH_DELIMITER: char = '/';

/// Structured error types for path construction and resolution.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A segment's container kind conflicts with an existing non-Null node.
    #[error("path segment '{segment}' conflicts with existing {found} node")]
    KindConflict { segment: String, found: String },

    /// A slice segment is malformed (zero step).
    #[error("invalid slice {start}:{stop}:{step}: step must be non-zero")]
    InvalidSlice {
        start: isize,
        stop: isize,
        step: isize,
    },

    /// An empty path was used where at least one segment is required.
    #[error("empty path cannot address an entry")]
    EmptyPath,

    /// A segment kind is not usable with the attempted operation, such as
    /// a slice in a mutating walk.
    #[error("segment '{segment}' is not supported by {operation}")]
    UnsupportedSegment { segment: String, operation: String },
}

impl PathError {
    /// Check if this error is a container-kind conflict.
    pub fn is_kind_conflict(&self) -> bool {
        matches!(self, PathError::KindConflict { .. })
    }

    /// Check if this error is a malformed-slice error.
    pub fn is_invalid_slice(&self) -> bool {
        matches!(self, PathError::InvalidSlice { .. })
    }
}

impl From<PathError> for crate::Error {
    fn from(err: PathError) -> Self {
        crate::Error::Path(err)
    }
}

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// An object key.
    Key(String),
    /// An array index. Negative means "append a new slot then address it".
    Index(isize),
    /// A half-open position range with stride, python style.
    Slice {
        start: isize,
        stop: isize,
        step: isize,
    },
}

impl Segment {
    /// Creates a key segment.
    pub fn key(key: impl Into<String>) -> Self {
        Segment::Key(key.into())
    }

    /// Creates an index segment.
    pub fn index(idx: isize) -> Self {
        Segment::Index(idx)
    }

    /// Creates a slice segment.
    pub fn slice(start: isize, stop: isize, step: isize) -> Self {
        Segment::Slice { start, stop, step }
    }

    /// Returns the key text if this is a key segment.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k),
            _ => None,
        }
    }

    /// Returns the index a numeric segment addresses.
    ///
    /// `Index` segments return their index directly; a `Key` segment
    /// returns one only when its text parses as an integer. Whether that
    /// hint is honored depends on the kind of the node being resolved.
    pub fn index_hint(&self) -> Option<isize> {
        match self {
            Segment::Index(idx) => Some(*idx),
            Segment::Key(k) => k.parse().ok(),
            Segment::Slice { .. } => None,
        }
    }

    /// Returns true if this segment requires array semantics.
    pub fn is_array_kind(&self) -> bool {
        matches!(self, Segment::Index(_) | Segment::Slice { .. })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => f.write_str(k),
            Segment::Index(idx) => write!(f, "{idx}"),
            Segment::Slice { start, stop, step } => write!(f, "{start}:{stop}:{step}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<isize> for Segment {
    fn from(idx: isize) -> Self {
        Segment::Index(idx)
    }
}

/// An immutable ordered sequence of segments addressing a location in a
/// data tree.
///
/// Parsing normalizes the literal: empty segments are dropped, so
/// `"a//b"`, `"/a/b"` and `"a/b/"` all parse to the same two-segment path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `/`-delimited literal into key segments.
    ///
    /// Every segment of a literal is a key; see the module docs for how
    /// numeric-looking keys behave at resolution time.
    pub fn parse(literal: &str) -> Self {
        let segments = literal
            .split(PATH_DELIMITER)
            .filter(|s| !s.is_empty())
            .map(Segment::from)
            .collect();
        Self { segments }
    }

    /// Appends a key segment.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    /// Appends an index segment.
    pub fn index(mut self, idx: isize) -> Self {
        self.segments.push(Segment::Index(idx));
        self
    }

    /// Appends a slice segment.
    pub fn slice(mut self, start: isize, stop: isize, step: isize) -> Self {
        self.segments.push(Segment::Slice { start, stop, step });
        self
    }

    /// Appends an arbitrary segment.
    pub fn push(mut self, segment: impl Into<Segment>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Concatenates another path onto this one.
    pub fn join(mut self, other: impl AsRef<Path>) -> Self {
        self.segments
            .extend(other.as_ref().segments.iter().cloned());
        self
    }

    /// Iterates over the segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the leading segment, or `None` if empty.
    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    /// Returns the final segment, or `None` if empty.
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Returns the path without its final segment, or `None` if empty.
    pub fn parent(&self) -> Option<Path> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Path {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Splits into (everything but the last segment, last segment).
    ///
    /// Used by mutating path operations that resolve the parent before
    /// acting on the leaf entry.
    pub(crate) fn split_last(&self) -> Result<(Path, &Segment), PathError> {
        match self.segments.split_last() {
            Some((last, init)) => Ok((
                Path {
                    segments: init.to_vec(),
                },
                last,
            )),
            None => Err(PathError::EmptyPath),
        }
    }
}

impl AsRef<Path> for Path {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl FromStr for Path {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Path::parse(s))
    }
}

impl From<&str> for Path {
    fn from(literal: &str) -> Self {
        Path::parse(literal)
    }
}

impl From<&Path> for Path {
    fn from(path: &Path) -> Self {
        path.clone()
    }
}

impl From<Segment> for Path {
    fn from(segment: Segment) -> Self {
        Path {
            segments: vec![segment],
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("(empty path)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{PATH_DELIMITER}")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
