//! Binary block payloads.
//!
//! A [`DataBlock`] carries an opaque byte payload together with an element
//! type descriptor and shape/stride metadata. Blocks are the transport for
//! tensor-like data produced by backends; the tree never interprets the
//! bytes itself.

use serde::{Deserialize, Serialize};

/// Element type descriptor for a [`DataBlock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScalarKind {
    /// Unsigned 8-bit integers (raw bytes).
    #[default]
    U8,
    /// Signed 32-bit integers.
    I32,
    /// Signed 64-bit integers.
    I64,
    /// 32-bit floats.
    F32,
    /// 64-bit floats.
    F64,
    /// Pairs of 64-bit floats interpreted as complex numbers.
    C64,
}

impl ScalarKind {
    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        match self {
            ScalarKind::U8 => 1,
            ScalarKind::I32 | ScalarKind::F32 => 4,
            ScalarKind::I64 | ScalarKind::F64 => 8,
            ScalarKind::C64 => 16,
        }
    }
}

/// An opaque binary payload with element type and shape metadata.
///
/// A block is treated as an immutable value once set: there are accessors
/// but no mutators, and replacing the contents of a Block node requires
/// installing a whole new `DataBlock`.
///
/// Strides are expressed in elements, not bytes. When a block is built
/// from a shape alone the strides default to C order (row major).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataBlock {
    kind: ScalarKind,
    shape: Vec<usize>,
    strides: Vec<usize>,
    #[serde(with = "serde_bytes")]
    data: Vec<u8>,
}

impl DataBlock {
    /// Creates an empty block (zero elements, `U8` kind).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a block from raw bytes with C-order strides derived from `shape`.
    pub fn from_bytes(kind: ScalarKind, shape: Vec<usize>, data: Vec<u8>) -> Self {
        let strides = c_order_strides(&shape);
        Self {
            kind,
            shape,
            strides,
            data,
        }
    }

    /// Creates a block with explicit strides.
    pub fn with_strides(
        kind: ScalarKind,
        shape: Vec<usize>,
        strides: Vec<usize>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            kind,
            shape,
            strides,
            data,
        }
    }

    /// The element type descriptor.
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// The shape, one extent per dimension.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Strides in elements, one per dimension.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// The raw byte payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements described by the shape.
    pub fn element_count(&self) -> usize {
        if self.shape.is_empty() {
            0
        } else {
            self.shape.iter().product()
        }
    }

    /// Returns true if the block holds no elements.
    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }
}

/// Computes row-major strides for `shape`, in elements.
fn c_order_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1].max(1);
    }
    strides
}
