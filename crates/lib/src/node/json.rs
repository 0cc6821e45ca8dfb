//! JSON import and export for node trees.
//!
//! Trees convert to and from [`serde_json::Value`] for display, export,
//! and loading JSON-shaped documents into default backends. The
//! conversion is by necessity lossy for the alternatives JSON cannot
//! express: blocks export as a descriptive object, stored paths export as
//! their literal form, and references export their resolved target.
//! JSON-expressible trees round-trip exactly.

use serde_json::{Map, Number, json};

use crate::Result;
use crate::node::{Node, NodeError};
use crate::value::Value;

impl Node {
    /// Deep export of the resolved subtree as a JSON value.
    ///
    /// References are chased through [`Node::resolve`], so a chain or a
    /// redirection back into an ancestor fails with `CyclicReference`
    /// rather than recursing forever.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let mut on_stack = Vec::new();
        export(self, &mut on_stack)
    }

    /// Deep import of a JSON value into a fresh tree on default backends.
    ///
    /// Integers become Long, floats become Double, JSON objects become
    /// in-memory Object nodes and JSON arrays become Array nodes.
    pub fn from_json(value: &serde_json::Value) -> Node {
        let node = Node::new();
        import_into(&node, value);
        node
    }

    /// Serializes the tree to an indented JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        let json = self.to_json()?;
        Ok(serde_json::to_string_pretty(&json)?)
    }

    /// Parses a JSON document into a tree.
    pub fn from_json_str(text: &str) -> Result<Node> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Ok(Node::from_json(&json))
    }
}

/// Recursive export with a cycle guard over the container cells
/// currently being rendered.
fn export(node: &Node, on_stack: &mut Vec<usize>) -> Result<serde_json::Value> {
    let target = node.resolve()?;
    let cell_id = target.cell_id();
    if on_stack.contains(&cell_id) {
        return Err(NodeError::CyclicReference {
            depth: on_stack.len(),
        }
        .into());
    }

    let value = target.value()?;
    let json = match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Int(n) => serde_json::Value::Number(n.into()),
        Value::Long(n) => serde_json::Value::Number(n.into()),
        Value::Float(x) => float_json(f64::from(x)),
        Value::Double(x) => float_json(x),
        Value::Text(s) => serde_json::Value::String(s),
        Value::IntVec3(v) => json!(v),
        Value::LongVec3(v) => json!(v),
        Value::FloatVec3(v) => json!(v),
        Value::DoubleVec3(v) => json!(v),
        Value::Complex(c) => json!({ "re": c.re, "im": c.im }),
        Value::ComplexVec3(v) => serde_json::Value::Array(
            v.iter().map(|c| json!({ "re": c.re, "im": c.im })).collect(),
        ),
        Value::Block(block) => json!({
            "kind": format!("{:?}", block.kind()),
            "shape": block.shape(),
            "strides": block.strides(),
            "data": block.data(),
        }),
        Value::Path(path) => serde_json::Value::String(path.to_string()),
        Value::Array(array) => {
            on_stack.push(cell_id);
            let mut items = Vec::with_capacity(array.len());
            for child in array.iter() {
                items.push(export(child, on_stack)?);
            }
            on_stack.pop();
            serde_json::Value::Array(items)
        }
        Value::Object(_) => {
            on_stack.push(cell_id);
            let mut map = Map::new();
            for (key, child) in target.kv_items() {
                map.insert(key, export(&child, on_stack)?);
            }
            on_stack.pop();
            serde_json::Value::Object(map)
        }
        // resolve() returned a terminal, so this alternative is gone.
        Value::Reference(_) => unreachable!("resolved node cannot be a reference"),
    };
    Ok(json)
}

fn float_json(x: f64) -> serde_json::Value {
    match Number::from_f64(x) {
        Some(number) => serde_json::Value::Number(number),
        // Non-finite floats have no JSON form.
        None => serde_json::Value::Null,
    }
}

fn import_into(node: &Node, value: &serde_json::Value) {
    match value {
        serde_json::Value::Null => {}
        serde_json::Value::Bool(b) => node.set(*b),
        serde_json::Value::Number(number) => {
            if let Some(n) = number.as_i64() {
                node.set(n);
            } else if let Some(x) = number.as_f64() {
                node.set(x);
            }
        }
        serde_json::Value::String(s) => node.set(s.as_str()),
        serde_json::Value::Array(items) => {
            for item in items {
                // Import failures cannot happen on a fresh Null node.
                let slot = node.push_back().expect("fresh node coerces to array");
                import_into(&slot, item);
            }
            if items.is_empty() {
                let _ = node.resize(0);
            }
        }
        serde_json::Value::Object(map) => {
            if map.is_empty() {
                let _ = node.as_object();
            }
            for (key, item) in map {
                let slot = node.insert(key).expect("fresh node coerces to object");
                import_into(&slot, item);
            }
        }
    }
}
