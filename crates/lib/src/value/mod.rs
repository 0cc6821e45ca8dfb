//! Value types for hierarchical data nodes.
//!
//! This module provides the [`Value`] enum, the closed set of alternatives a
//! node can hold. Values are either leaves (scalars, fixed-size vectors,
//! binary blocks, stored paths) or branches (objects, arrays), plus the
//! [`Value::Reference`] alternative that redirects to another node.
//!
//! The container alternatives are open: objects are held as boxed
//! [`NodeObject`] trait objects so that storage backends outside this crate
//! can stand behind the same value model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeArray, NodeError, NodeObject};
use crate::path::Path;

pub mod block;

pub use block::{DataBlock, ScalarKind};

/// A complex number with 64-bit components.
///
/// Kept as a plain value type so vector alternatives can embed it by value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex64 {
    pub re: f64,
    pub im: f64,
}

impl Complex64 {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl From<(f64, f64)> for Complex64 {
    fn from((re, im): (f64, f64)) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im < 0.0 {
            write!(f, "{}{}i", self.re, self.im)
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}

/// Stable tag identifying the current alternative of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Null,
    Object,
    Array,
    Block,
    Path,
    Bool,
    Int,
    Long,
    Float,
    Double,
    Text,
    IntVec3,
    LongVec3,
    FloatVec3,
    DoubleVec3,
    Complex,
    ComplexVec3,
    Reference,
}

impl ValueType {
    /// Returns the tag name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Object => "object",
            ValueType::Array => "array",
            ValueType::Block => "block",
            ValueType::Path => "path",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Long => "long",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::Text => "text",
            ValueType::IntVec3 => "int_vec3",
            ValueType::LongVec3 => "long_vec3",
            ValueType::FloatVec3 => "float_vec3",
            ValueType::DoubleVec3 => "double_vec3",
            ValueType::Complex => "complex",
            ValueType::ComplexVec3 => "complex_vec3",
            ValueType::Reference => "reference",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The closed set of alternatives a node can hold.
///
/// A node holds exactly one alternative at a time. Switching alternatives is
/// an explicit mutation performed through the node API; the value itself is
/// inert data.
///
/// # Reads and widening
///
/// Typed reads go through `TryFrom<&Value>` and succeed for widening numeric
/// conversions only: an `Int` reads as `i64` or `f64`, but a `Double` does
/// not read as `i32`. Narrowing must be done explicitly by the caller.
/// Numeric scalars additionally read as `String` via their display form, and
/// `Text` reads as a numeric type when its content parses.
///
/// # Direct comparisons
///
/// `Value` implements `PartialEq` against primitive types in both
/// directions:
///
/// ```
/// # use hdata::value::Value;
/// let text = Value::Text("hello".to_string());
/// let number = Value::Int(42);
/// assert!(text == "hello");
/// assert!(42 == number);
/// assert!(!(text == 42));
/// ```
#[derive(Debug, Default)]
pub enum Value {
    /// Null, the default alternative of a fresh node.
    #[default]
    Null,
    /// String-keyed unordered mapping, backed by a pluggable storage backend.
    Object(Box<dyn NodeObject>),
    /// Ordered sequence of nodes.
    Array(NodeArray),
    /// Opaque binary/tensor payload.
    Block(DataBlock),
    /// A stored address, usable for symbolic linking.
    Path(Path),
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Text(String),
    IntVec3([i32; 3]),
    LongVec3([i64; 3]),
    FloatVec3([f32; 3]),
    DoubleVec3([f64; 3]),
    Complex(Complex64),
    ComplexVec3([Complex64; 3]),
    /// Redirection to another node. All structural operations follow it.
    Reference(Node),
}

impl Value {
    /// Returns the tag of the current alternative.
    ///
    /// This is the raw tag of the value itself: a `Reference` reports
    /// `ValueType::Reference`. Resolved tags are the node's business.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Object(_) => ValueType::Object,
            Value::Array(_) => ValueType::Array,
            Value::Block(_) => ValueType::Block,
            Value::Path(_) => ValueType::Path,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Long(_) => ValueType::Long,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::Text(_) => ValueType::Text,
            Value::IntVec3(_) => ValueType::IntVec3,
            Value::LongVec3(_) => ValueType::LongVec3,
            Value::FloatVec3(_) => ValueType::FloatVec3,
            Value::DoubleVec3(_) => ValueType::DoubleVec3,
            Value::Complex(_) => ValueType::Complex,
            Value::ComplexVec3(_) => ValueType::ComplexVec3,
            Value::Reference(_) => ValueType::Reference,
        }
    }

    /// Returns the tag name of the current alternative.
    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    /// Returns true if this is the Null alternative.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is a branch alternative (Object or Array).
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }

    /// Returns true if this is a leaf alternative (not a container and not
    /// a reference).
    pub fn is_leaf(&self) -> bool {
        !matches!(
            self,
            Value::Object(_) | Value::Array(_) | Value::Reference(_)
        )
    }

    /// Returns true if this is a Reference alternative.
    pub fn is_reference(&self) -> bool {
        matches!(self, Value::Reference(_))
    }

    /// Attempts to view this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to view this value as a 64-bit integer (widening from Int).
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to view this value as a 64-bit float (widening from the
    /// narrower numeric alternatives).
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(f64::from(*n)),
            Value::Long(n) => Some(*n as f64),
            Value::Float(x) => Some(f64::from(*x)),
            Value::Double(x) => Some(*x),
            _ => None,
        }
    }

    /// Attempts to view this value as a string slice.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to view this value as a block.
    pub fn as_block(&self) -> Option<&DataBlock> {
        match self {
            Value::Block(b) => Some(b),
            _ => None,
        }
    }

    /// Attempts to view this value as a stored path.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Attempts to view this value as an array.
    pub fn as_array(&self) -> Option<&NodeArray> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Attempts to view this value as a mutable array.
    pub fn as_array_mut(&mut self) -> Option<&mut NodeArray> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Attempts to view this value as an object backend.
    pub fn as_object(&self) -> Option<&dyn NodeObject> {
        match self {
            Value::Object(o) => Some(o.as_ref()),
            _ => None,
        }
    }

    /// Attempts to view this value as a mutable object backend.
    pub fn as_object_mut(&mut self) -> Option<&mut dyn NodeObject> {
        match self {
            Value::Object(o) => Some(o.as_mut()),
            _ => None,
        }
    }

    /// Attempts to view this value as the referenced node.
    pub fn as_reference(&self) -> Option<&Node> {
        match self {
            Value::Reference(n) => Some(n),
            _ => None,
        }
    }
}

// Containers clone shallowly: an Object or Array clone shares the child
// node handles with the original, mirroring how container handles behave
// when passed around. Deep copies go through the node API.
impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Value::Null => Value::Null,
            Value::Object(o) => Value::Object(o.boxed_clone()),
            Value::Array(a) => Value::Array(a.clone()),
            Value::Block(b) => Value::Block(b.clone()),
            Value::Path(p) => Value::Path(p.clone()),
            Value::Bool(b) => Value::Bool(*b),
            Value::Int(n) => Value::Int(*n),
            Value::Long(n) => Value::Long(*n),
            Value::Float(x) => Value::Float(*x),
            Value::Double(x) => Value::Double(*x),
            Value::Text(s) => Value::Text(s.clone()),
            Value::IntVec3(v) => Value::IntVec3(*v),
            Value::LongVec3(v) => Value::LongVec3(*v),
            Value::FloatVec3(v) => Value::FloatVec3(*v),
            Value::DoubleVec3(v) => Value::DoubleVec3(*v),
            Value::Complex(c) => Value::Complex(*c),
            Value::ComplexVec3(v) => Value::ComplexVec3(*v),
            Value::Reference(n) => Value::Reference(n.clone()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::IntVec3(a), Value::IntVec3(b)) => a == b,
            (Value::LongVec3(a), Value::LongVec3(b)) => a == b,
            (Value::FloatVec3(a), Value::FloatVec3(b)) => a == b,
            (Value::DoubleVec3(a), Value::DoubleVec3(b)) => a == b,
            (Value::Complex(a), Value::Complex(b)) => a == b,
            (Value::ComplexVec3(a), Value::ComplexVec3(b)) => a == b,
            (Value::Block(a), Value::Block(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                if a.len() != b.len() {
                    return false;
                }
                let mut items = a.kv_items();
                while let Some((key, node)) = items.next() {
                    match b.find(&key) {
                        Ok(other_node) => {
                            if node != other_node {
                                return false;
                            }
                        }
                        Err(_) => return false,
                    }
                }
                true
            }
            // References compare by identity of the referenced cell, not by
            // resolved content, so comparison never chases a cycle.
            (Value::Reference(a), Value::Reference(b)) => Node::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Double(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::IntVec3(v) => write!(f, "[{}, {}, {}]", v[0], v[1], v[2]),
            Value::LongVec3(v) => write!(f, "[{}, {}, {}]", v[0], v[1], v[2]),
            Value::FloatVec3(v) => write!(f, "[{}, {}, {}]", v[0], v[1], v[2]),
            Value::DoubleVec3(v) => write!(f, "[{}, {}, {}]", v[0], v[1], v[2]),
            Value::Complex(c) => write!(f, "{c}"),
            Value::ComplexVec3(v) => write!(f, "[{}, {}, {}]", v[0], v[1], v[2]),
            Value::Block(b) => write!(
                f,
                "<block {:?} shape={:?} ({} bytes)>",
                b.kind(),
                b.shape(),
                b.data().len()
            ),
            Value::Path(p) => write!(f, "<path {p}>"),
            Value::Object(o) => write!(f, "<object ({} entries)>", o.len()),
            Value::Array(a) => write!(f, "<array ({} elements)>", a.len()),
            Value::Reference(_) => write!(f, "<reference>"),
        }
    }
}

// Convenient From implementations for common types.
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<[i32; 3]> for Value {
    fn from(value: [i32; 3]) -> Self {
        Value::IntVec3(value)
    }
}

impl From<[i64; 3]> for Value {
    fn from(value: [i64; 3]) -> Self {
        Value::LongVec3(value)
    }
}

impl From<[f32; 3]> for Value {
    fn from(value: [f32; 3]) -> Self {
        Value::FloatVec3(value)
    }
}

impl From<[f64; 3]> for Value {
    fn from(value: [f64; 3]) -> Self {
        Value::DoubleVec3(value)
    }
}

impl From<Complex64> for Value {
    fn from(value: Complex64) -> Self {
        Value::Complex(value)
    }
}

impl From<[Complex64; 3]> for Value {
    fn from(value: [Complex64; 3]) -> Self {
        Value::ComplexVec3(value)
    }
}

impl From<DataBlock> for Value {
    fn from(value: DataBlock) -> Self {
        Value::Block(value)
    }
}

impl From<Path> for Value {
    fn from(value: Path) -> Self {
        Value::Path(value)
    }
}

impl From<NodeArray> for Value {
    fn from(value: NodeArray) -> Self {
        Value::Array(value)
    }
}

fn type_mismatch(expected: &str, value: &Value) -> NodeError {
    NodeError::TypeMismatch {
        expected: expected.to_string(),
        actual: value.type_name().to_string(),
    }
}

// Typed reads. Widening conversions succeed, narrowing ones fail, and text
// interconverts with numerics where the content allows it.
impl TryFrom<&Value> for bool {
    type Error = NodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_bool().ok_or_else(|| type_mismatch("bool", value))
    }
}

impl TryFrom<&Value> for i32 {
    type Error = NodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(n) => Ok(*n),
            Value::Text(s) => s.parse().map_err(|_| type_mismatch("i32", value)),
            _ => Err(type_mismatch("i32", value)),
        }
    }
}

impl TryFrom<&Value> for i64 {
    type Error = NodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(n) => Ok(i64::from(*n)),
            Value::Long(n) => Ok(*n),
            Value::Text(s) => s.parse().map_err(|_| type_mismatch("i64", value)),
            _ => Err(type_mismatch("i64", value)),
        }
    }
}

impl TryFrom<&Value> for f32 {
    type Error = NodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(n) => Ok(*n as f32),
            Value::Float(x) => Ok(*x),
            Value::Text(s) => s.parse().map_err(|_| type_mismatch("f32", value)),
            _ => Err(type_mismatch("f32", value)),
        }
    }
}

impl TryFrom<&Value> for f64 {
    type Error = NodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(n) => Ok(f64::from(*n)),
            Value::Long(n) => Ok(*n as f64),
            Value::Float(x) => Ok(f64::from(*x)),
            Value::Double(x) => Ok(*x),
            Value::Text(s) => s.parse().map_err(|_| type_mismatch("f64", value)),
            _ => Err(type_mismatch("f64", value)),
        }
    }
}

impl TryFrom<&Value> for String {
    type Error = NodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Int(n) => Ok(n.to_string()),
            Value::Long(n) => Ok(n.to_string()),
            Value::Float(x) => Ok(x.to_string()),
            Value::Double(x) => Ok(x.to_string()),
            _ => Err(type_mismatch("string", value)),
        }
    }
}

impl TryFrom<&Value> for Complex64 {
    type Error = NodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Complex(c) => Ok(*c),
            _ => Err(type_mismatch("complex", value)),
        }
    }
}

impl TryFrom<&Value> for [f64; 3] {
    type Error = NodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::DoubleVec3(v) => Ok(*v),
            Value::IntVec3(v) => Ok([f64::from(v[0]), f64::from(v[1]), f64::from(v[2])]),
            Value::FloatVec3(v) => Ok([f64::from(v[0]), f64::from(v[1]), f64::from(v[2])]),
            _ => Err(type_mismatch("double_vec3", value)),
        }
    }
}

impl TryFrom<&Value> for DataBlock {
    type Error = NodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Block(b) => Ok(b.clone()),
            _ => Err(type_mismatch("block", value)),
        }
    }
}

impl TryFrom<&Value> for Path {
    type Error = NodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Path(p) => Ok(p.clone()),
            _ => Err(type_mismatch("path", value)),
        }
    }
}

// PartialEq against primitives, both directions.
impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        matches!(self, Value::Int(n) if n == other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_long() == Some(*other)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        self.as_double() == Some(*other)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self.as_text() == Some(other.as_str())
    }
}

impl PartialEq<Value> for bool {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for i32 {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for i64 {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for f64 {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for str {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other == *self
    }
}

impl PartialEq<Value> for String {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}
