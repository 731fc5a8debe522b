//! Shared-node value model for application state.
//!
//! This module provides:
//!
//! - [`Value`]: scalars plus composite nodes held behind shared handles
//! - [`Map`]: insertion-ordered mapping with unique string keys
//! - [`NodeId`]: the identity of a composite node
//!
//! Cloning a [`Value`] clones the handle, not the node, so two clones of an
//! object are the *same* object. This is what makes structural sharing and
//! identity cycles expressible:
//!
//! ```rust
//! use state_reporter::Value;
//!
//! let state = Value::object();
//! state.set("a", 1);
//! state.set("b", state.clone());
//!
//! assert!(state.get("b").is_some_and(|b| b.same_node(&state)));
//! assert_eq!(state.to_string(), r#"{"a":1}"#);
//! ```
//!
//! `Value` does not implement structural `PartialEq`: comparing two cyclic
//! values structurally would never terminate. Compare decycled text or use
//! [`Value::same_node`] instead.

mod convert;
mod map;

use std::{cell::RefCell, fmt, rc::Rc};

pub use map::Map;
use serde_json::Number;

use crate::decycle::decycle;

// =============================================================================
// NodeId - identity of a composite node
// =============================================================================

/// Identity of a composite node, derived from the address of its shared allocation.
///
/// Ids are only meaningful while the node is alive; the serializer uses them
/// within a single call, during which every node it visits is borrowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    fn of<T>(node: &Rc<RefCell<T>>) -> Self {
        Self(Rc::as_ptr(node).cast::<()>() as usize)
    }
}

// =============================================================================
// Value
// =============================================================================

/// A node of application state.
///
/// `Undefined` models an absent value: it is dropped from objects and encoded
/// as `null` inside arrays when serialized, and a top-level `Undefined` has no
/// textual form at all.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<Map>>),
}

impl Value {
    /// Creates a fresh, empty object node.
    #[must_use]
    pub fn object() -> Self {
        Self::Object(Rc::new(RefCell::new(Map::new())))
    }

    /// Creates a fresh, empty array node.
    #[must_use]
    pub fn array() -> Self {
        Self::Array(Rc::new(RefCell::new(Vec::new())))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for objects and arrays.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    /// Returns the identity of a composite node, or `None` for scalars.
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Array(items) => Some(NodeId::of(items)),
            Self::Object(map) => Some(NodeId::of(map)),
            _ => None,
        }
    }

    /// Returns `true` when both values are handles to the same composite node.
    pub fn same_node(&self, other: &Value) -> bool {
        match (self.node_id(), other.node_id()) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }

    /// Copies the top level of a composite node into a fresh node.
    ///
    /// Children are copied as handles, so nested nodes stay shared with the
    /// original. Scalars are returned as plain clones.
    #[must_use]
    pub fn shallow_clone(&self) -> Self {
        match self {
            Self::Array(items) => Self::Array(Rc::new(RefCell::new(items.borrow().clone()))),
            Self::Object(map) => Self::Object(Rc::new(RefCell::new(map.borrow().clone()))),
            scalar => scalar.clone(),
        }
    }

    /// Looks up a child by key.
    ///
    /// Objects are indexed by key; arrays accept a decimal index. The result is
    /// a handle, so mutating a returned composite mutates the node in place.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Self::Object(map) => map.borrow().get(key).cloned(),
            Self::Array(items) => {
                let index = key.parse::<usize>().ok()?;
                items.borrow().get(index).cloned()
            }
            _ => None,
        }
    }

    /// Follows a dot-delimited path of keys, see [`Value::get`].
    pub fn get_path(&self, dotted: &str) -> Option<Value> {
        dotted
            .split('.')
            .try_fold(self.clone(), |node, key| node.get(key))
    }

    /// Sets `key` on an object node, returning the previous value.
    ///
    /// Does nothing on non-object values.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        match self {
            Self::Object(map) => map.borrow_mut().insert(key, value.into()),
            _ => None,
        }
    }

    /// Appends to an array node. Does nothing on non-array values.
    pub fn push(&self, value: impl Into<Value>) {
        if let Self::Array(items) = self {
            items.borrow_mut().push(value.into());
        }
    }

    /// Number of entries of a composite node; `0` for scalars.
    pub fn len(&self) -> usize {
        match self {
            Self::Array(items) => items.borrow().len(),
            Self::Object(map) => map.borrow().len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(number) => number.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => number.as_f64(),
            _ => None,
        }
    }
}

// Both impls print decycled JSON so cyclic values never recurse forever.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match decycle(self) {
            Some(text) => f.write_str(&text),
            None => f.write_str("undefined"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_the_node() {
        let original = Value::object();
        let alias = original.clone();
        alias.set("a", 1);

        assert!(alias.same_node(&original));
        assert_eq!(original.get("a").and_then(|a| a.as_i64()), Some(1));
    }

    #[test]
    fn shallow_clone_is_a_new_node_with_shared_children() {
        let child = Value::object();
        let parent = Value::object();
        parent.set("child", child.clone());

        let copy = parent.shallow_clone();
        assert!(!copy.same_node(&parent));
        assert!(copy.get("child").is_some_and(|c| c.same_node(&child)));

        copy.set("extra", true);
        assert!(parent.get("extra").is_none());
    }

    #[test]
    fn scalars_have_no_identity() {
        assert!(Value::from(1).node_id().is_none());
        assert!(!Value::Null.same_node(&Value::Null));
    }

    #[test]
    fn get_indexes_arrays() {
        let items = Value::array();
        items.push("zero");
        items.push("one");

        assert_eq!(items.get("1").as_ref().and_then(Value::as_str), Some("one"));
        assert!(items.get("2").is_none());
        assert!(items.get("x").is_none());
    }

    #[test]
    fn get_path_descends_objects() {
        let inner = Value::object();
        inner.set("b", "leaf");
        let outer = Value::object();
        outer.set("a", inner);

        let leaf = outer.get_path("a.b");
        assert_eq!(leaf.as_ref().and_then(Value::as_str), Some("leaf"));
        assert!(outer.get_path("a.missing").is_none());
    }

    #[test]
    fn debug_output_terminates_on_cycles() {
        let node = Value::object();
        node.set("self", node.clone());
        assert_eq!(format!("{node:?}"), "{}");
        assert_eq!(Value::Undefined.to_string(), "undefined");
    }
}
