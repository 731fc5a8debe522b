//! Cycle-safe JSON encoding.
//!
//! The encoder keeps one visited set of node identities for the whole
//! traversal. A composite node seen before, anywhere earlier in the walk, is
//! omitted where it reappears: its key is dropped from the enclosing object,
//! or its element is dropped from the enclosing array (the array shrinks).
//! No reference markers are written and cyclic input never fails.
//!
//! Because identities are never removed from the set, a node shared by two
//! sibling branches is written only under the first one. For acyclic trees
//! without shared nodes the output is exactly `serde_json::to_string`.
//!
//! ```rust
//! use state_reporter::{Value, decycle};
//!
//! let state = Value::from(serde_json::json!({"a": 1, "c": {"a": 1}}));
//! state.set("b", state.clone());
//!
//! assert_eq!(decycle(&state).as_deref(), Some(r#"{"a":1,"c":{"a":1}}"#));
//! assert_eq!(decycle(&Value::Undefined), None);
//! ```

use std::{cell::RefCell, collections::HashSet};

use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};
use tracing::warn;

use crate::value::{NodeId, Value};

/// Encodes `value` as decycled JSON text.
///
/// Returns `None` for a top-level `Undefined`, which has no textual form.
pub fn decycle(value: &Value) -> Option<String> {
    if value.is_undefined() {
        return None;
    }
    match serde_json::to_string(&Decycled::new(value)) {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(error = %err, "failed to encode decycled value");
            None
        }
    }
}

// =============================================================================
// Decycled - Serialize adapter
// =============================================================================

/// `Serialize` adapter that applies the repeated-node omission policy.
///
/// Every call to `serialize` starts from an empty visited set, so the same
/// adapter can be encoded more than once with identical results.
#[derive(Clone, Copy, Debug)]
pub struct Decycled<'a> {
    value: &'a Value,
}

impl<'a> Decycled<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }
}

impl Serialize for Decycled<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let visited = RefCell::new(HashSet::new());
        let walk = Walk {
            value: self.value,
            visited: &visited,
        };
        walk.admit(self.value);
        walk.serialize(serializer)
    }
}

// =============================================================================
// Walk - one position in the traversal
// =============================================================================

struct Walk<'a> {
    value: &'a Value,
    visited: &'a RefCell<HashSet<NodeId>>,
}

impl Walk<'_> {
    fn at<'b>(&'b self, value: &'b Value) -> Walk<'b> {
        Walk {
            value,
            visited: self.visited,
        }
    }

    /// Records a composite as visited. Returns `false` if it was seen before.
    fn admit(&self, value: &Value) -> bool {
        match value.node_id() {
            Some(id) => self.visited.borrow_mut().insert(id),
            None => true,
        }
    }
}

impl Serialize for Walk<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(flag) => serializer.serialize_bool(*flag),
            Value::Number(number) => number.serialize(serializer),
            Value::String(text) => serializer.serialize_str(text),
            Value::Array(items) => {
                let items = items.borrow();
                let mut seq = serializer.serialize_seq(None)?;
                for item in items.iter() {
                    if self.admit(item) {
                        seq.serialize_element(&self.at(item))?;
                    }
                }
                seq.end()
            }
            Value::Object(map) => {
                let map = map.borrow();
                let mut entries = serializer.serialize_map(None)?;
                for (key, item) in map.iter() {
                    if item.is_undefined() || !self.admit(item) {
                        continue;
                    }
                    entries.serialize_entry(key, &self.at(item))?;
                }
                entries.end()
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
