//! Adapters for emitting state snapshots and failure reports through `slog`.
//!
//! This module connects [`Value`] with `slog` by providing a `slog::Value`
//! implementation that logs a decycled snapshot as structured JSON via
//! `slog`'s nested-value support, plus a [`Reporter`] backed by a `Logger`.
//!
//! Logging never fails because of the data: encoding problems are emitted as
//! placeholder strings rather than propagated.

use serde_json::Value as JsonValue;
use slog::{Key, Logger, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{
    interceptor::{BoxError, Failure, ReportContext, Reporter},
    value::Value,
};

/// A decycled snapshot of a [`Value`], loggable as nested structured data.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotValue(JsonValue);

impl SnapshotValue {
    pub fn new(value: &Value) -> Self {
        let json = value.to_json().unwrap_or_else(|err| {
            JsonValue::String(format!("Failed to serialize snapshot: {err}"))
        });
        Self(json)
    }

    pub fn value(&self) -> &JsonValue {
        &self.0
    }

    pub fn into_inner(self) -> JsonValue {
        self.0
    }
}

impl SlogValue for SnapshotValue {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.0.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// Extension trait for logging a [`Value`] through slog.
///
/// ## Example
/// ```ignore
/// use state_reporter::slog::SlogSnapshotExt;
///
/// info!(logger, "store updated"; "state" => state.slog_snapshot());
/// ```
pub trait SlogSnapshotExt {
    fn slog_snapshot(&self) -> SnapshotValue;
}

impl SlogSnapshotExt for Value {
    fn slog_snapshot(&self) -> SnapshotValue {
        SnapshotValue::new(self)
    }
}

/// Reports failures as `slog` records at `Error` level.
///
/// The state snapshot is logged as the already-serialized text from the
/// report context, so the record shows exactly what a remote service would
/// receive.
#[derive(Clone)]
pub struct SlogReporter {
    logger: Logger,
}

impl SlogReporter {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl Reporter for SlogReporter {
    fn report(&self, failure: Failure<'_>, context: &ReportContext) -> Result<(), BoxError> {
        let state = context.state.clone();
        match failure {
            Failure::Action { payload } => {
                slog::error!(self.logger, "failure action";
                    "payload" => payload.slog_snapshot(),
                    "state" => state
                );
            }
            Failure::Forwarding { error } => {
                slog::error!(self.logger, "forwarding failed";
                    "error" => error.to_string(),
                    "action" => context.action.clone(),
                    "state" => state
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn snapshot_value_is_decycled() {
        let value = Value::from(json!({"a": {"b": 1}}));
        value.set("loop", value.clone());
        assert_eq!(value.slog_snapshot().into_inner(), json!({"a": {"b": 1}}));
    }

    #[test]
    fn undefined_snapshots_are_null() {
        assert_eq!(Value::Undefined.slog_snapshot().value(), &JsonValue::Null);
    }
}
