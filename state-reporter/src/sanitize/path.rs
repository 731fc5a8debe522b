//! Dot-delimited key paths and copy-on-path assignment.

use std::{convert::Infallible, fmt, str::FromStr};

use tracing::{debug, trace};

use crate::value::Value;

// =============================================================================
// KeyPath
// =============================================================================

/// An ordered, non-empty sequence of keys naming one position in a state tree.
///
/// Parsing splits on `.` and keeps every segment, including empty ones:
/// `""` is the single key `""` and `"a..b"` is `["a", "", "b"]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    pub fn parse(dotted: &str) -> Self {
        Self {
            segments: dotted.split('.').map(str::to_owned).collect(),
        }
    }

    /// Builds a path from explicit segments. Returns `None` when empty.
    pub fn from_segments<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        (!segments.is_empty()).then_some(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn has_empty_segment(&self) -> bool {
        self.segments.iter().any(String::is_empty)
    }

    fn split_last(&self) -> (&str, &[String]) {
        match self.segments.split_last() {
            Some((last, parents)) => (last.as_str(), parents),
            None => ("", &[]),
        }
    }
}

impl From<&str> for KeyPath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl From<String> for KeyPath {
    fn from(dotted: String) -> Self {
        Self::parse(&dotted)
    }
}

impl From<&String> for KeyPath {
    fn from(dotted: &String) -> Self {
        Self::parse(dotted)
    }
}

impl FromStr for KeyPath {
    type Err = Infallible;

    fn from_str(dotted: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(dotted))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

// =============================================================================
// set_at_path
// =============================================================================

/// Assigns `value` at `path` below `root`, copying every node along the way.
///
/// Each intermediate position is replaced by a shallow copy of whatever was
/// there, so `root` and the fresh copies are the only nodes written to; every
/// node off the path stays shared with (and untouched in) the original tree.
///
/// - A non-composite `root` makes the call a no-op.
/// - A missing intermediate key gets a fresh empty object.
/// - A scalar (or `null`) at an intermediate position is overwritten with a
///   fresh empty object and the walk continues.
/// - Arrays are addressed by decimal index. An index equal to the length
///   appends; any other key does not address an element and ends the walk
///   without writing anything.
pub fn set_at_path(root: &Value, path: &KeyPath, value: Value) {
    assign_at_path(root, path, value);
}

/// Same as [`set_at_path`], returning `false` when `value` was not written.
pub(crate) fn assign_at_path(root: &Value, path: &KeyPath, value: Value) -> bool {
    if !root.is_composite() {
        return false;
    }

    let (last, parents) = path.split_last();
    let mut node = root.clone();
    for key in parents {
        let copy = match node.get(key) {
            Some(existing) if existing.is_composite() => existing.shallow_clone(),
            Some(_) => {
                trace!(%path, key = %key, "replacing non-composite path segment");
                Value::object()
            }
            None => Value::object(),
        };
        if !attach(&node, key, copy.clone()) {
            debug!(%path, key = %key, "key does not address an array element");
            return false;
        }
        node = copy;
    }
    if !attach(&node, last, value) {
        debug!(%path, key = %last, "key does not address an array element");
        return false;
    }
    true
}

fn attach(node: &Value, key: &str, value: Value) -> bool {
    match node {
        Value::Object(map) => {
            map.borrow_mut().insert(key, value);
            true
        }
        Value::Array(items) => {
            let mut items = items.borrow_mut();
            match key.parse::<usize>() {
                Ok(index) if index < items.len() => {
                    items[index] = value;
                    true
                }
                Ok(index) if index == items.len() => {
                    items.push(value);
                    true
                }
                _ => false,
            }
        }
        _ => false,
    }
}

// =============================================================================
// Tests
// =============================================================================
