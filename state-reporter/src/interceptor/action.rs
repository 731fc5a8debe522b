//! The pipeline action observed by the interceptor.

use crate::value::{Map, Value};

/// A state transition request flowing through the update pipeline.
#[derive(Clone, Debug, Default)]
pub struct Action {
    /// Action type, e.g. `"FETCH_USER_FAILED"`.
    pub kind: String,
    pub payload: Value,
    /// Set by producers of failure actions; read by the default predicate.
    pub error: bool,
}

impl Action {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Marks the action as a failure.
    #[must_use]
    pub fn failed(mut self) -> Self {
        self.error = true;
        self
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Object form used when the action itself is attached to a report:
    /// `{"type", "payload", "error"}`, with `payload` omitted when undefined
    /// and `error` only present on failures.
    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(3);
        map.insert("type", Value::from(self.kind.as_str()));
        map.insert("payload", self.payload.clone());
        if self.error {
            map.insert("error", Value::Bool(true));
        }
        Value::from(map)
    }
}
