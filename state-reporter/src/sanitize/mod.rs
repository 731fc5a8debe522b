//! State sanitization: masking sensitive paths before a snapshot leaves the process.
//!
//! This module provides:
//!
//! - **`path`**: [`KeyPath`] and [`set_at_path`], the copy-on-path assignment
//!   every masking step is built on.
//! - **Redaction specs**: [`RedactionSpec`] chooses between masking a list of
//!   paths and handing the whole state to a caller-supplied transform.
//!
//! Path masking never mutates its input. The result's top level is a fresh
//! node, nodes along each masked path are fresh copies, and everything else is
//! shared with the input.
//!
//! ```rust
//! use serde_json::json;
//! use state_reporter::{RedactionSpec, Value, sanitize};
//!
//! let state = Value::from(json!({"auth": {"token": "sk_live", "user": "alice"}}));
//! let masked = sanitize(&state, &RedactionSpec::paths(["auth.token"]));
//!
//! assert_eq!(masked.to_string(), r#"{"auth":{"token":"********","user":"alice"}}"#);
//! assert_eq!(state.to_string(), r#"{"auth":{"token":"sk_live","user":"alice"}}"#);
//! ```

mod path;

use std::{fmt, rc::Rc};

use path::assign_at_path;
pub use path::{KeyPath, set_at_path};
use tracing::warn;

use crate::value::Value;

/// Replacement written at every masked path.
pub const MASK: &str = "********";

/// Transform that fully replaces path masking.
pub type Transform = Rc<dyn Fn(&Value) -> Value>;

// =============================================================================
// RedactionSpec
// =============================================================================

/// How state is sanitized before it is serialized.
#[derive(Clone)]
pub enum RedactionSpec {
    /// Mask each path, in order. Later paths win where paths overlap.
    Paths(Vec<KeyPath>),
    /// Hand the state to a transform and use its result as-is.
    Transform(Transform),
}

impl RedactionSpec {
    pub fn paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<KeyPath>,
    {
        Self::Paths(paths.into_iter().map(Into::into).collect())
    }

    pub fn transform<F>(transform: F) -> Self
    where
        F: Fn(&Value) -> Value + 'static,
    {
        Self::Transform(Rc::new(transform))
    }
}

impl fmt::Debug for RedactionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paths(paths) => f.debug_tuple("Paths").field(paths).finish(),
            Self::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}

// =============================================================================
// sanitize
// =============================================================================

/// Sanitizes `source` according to `spec`, masking with [`MASK`].
#[must_use]
pub fn sanitize(source: &Value, spec: &RedactionSpec) -> Value {
    sanitize_with_mask(source, spec, &Value::from(MASK))
}

/// Sanitizes `source` according to `spec`, masking with `mask`.
///
/// A transform spec ignores `mask` and returns `transform(source)` untouched.
/// A path spec masks a shallow clone of `source`; a non-composite `source` is
/// returned as a plain clone since it has no paths to mask.
///
/// Every masked path gets its own copy of a composite `mask`, so masked
/// positions never share a node with each other or with `mask`.
#[must_use]
pub fn sanitize_with_mask(source: &Value, spec: &RedactionSpec, mask: &Value) -> Value {
    match spec {
        RedactionSpec::Transform(transform) => transform(source),
        RedactionSpec::Paths(_) if !source.is_composite() => source.clone(),
        RedactionSpec::Paths(paths) => {
            let updated = source.shallow_clone();
            for path in paths {
                if !assign_at_path(&updated, path, mask.detached_copy()) {
                    warn!(%path, "redaction path does not address a value; nothing was masked");
                }
            }
            updated
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
