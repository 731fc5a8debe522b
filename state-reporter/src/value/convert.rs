//! Conversions between [`Value`] and Rust / `serde_json` values.

use std::{cell::RefCell, rc::Rc};

use serde::Serialize;
use serde_json::{Number, Value as JsonValue};
use tracing::warn;

use super::{Map, Value};
use crate::decycle::Decycled;

impl Value {
    /// Builds a state tree from any serializable value.
    ///
    /// Every composite in the result is a fresh node; nothing is shared.
    pub fn from_serialize<T>(value: &T) -> Result<Self, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_value(value).map(Self::from)
    }

    /// Converts to a `serde_json::Value`, omitting repeated nodes the same way
    /// [`crate::decycle`] does. A top-level `Undefined` becomes `Null`.
    pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::to_value(Decycled::new(self))
    }

    /// Copies a composite into entirely fresh nodes, dropping repeated nodes
    /// the way [`crate::decycle`] does. Scalars are returned as plain clones.
    pub(crate) fn detached_copy(&self) -> Self {
        if !self.is_composite() {
            return self.clone();
        }
        match self.to_json() {
            Ok(json) => Self::from(json),
            Err(error) => {
                warn!(%error, "failed to copy value, sharing the original node");
                self.clone()
            }
        }
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(flag) => Self::Bool(flag),
            JsonValue::Number(number) => Self::Number(number),
            JsonValue::String(text) => Self::String(text),
            JsonValue::Array(items) => items.into_iter().map(Self::from).collect(),
            JsonValue::Object(entries) => entries
                .into_iter()
                .map(|(key, value)| (key, Self::from(value)))
                .collect::<Map>()
                .into(),
        }
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Object(Rc::new(RefCell::new(map)))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(Rc::new(RefCell::new(items)))
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::String(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        Self::Number(number)
    }
}

/// Non-finite floats have no JSON form and become `Null`.
impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Number::from_f64(number).map_or(Self::Null, Self::Number)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(number: $ty) -> Self {
                    Self::Number(Number::from(number))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
