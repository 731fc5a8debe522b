//! Adapters for emitting state snapshots and failure reports through `tracing`.
//!
//! - **`TracingDecycledExt`**: logs a [`Value`] as decycled JSON text. Works
//!   with any subscriber, including for cyclic values.
//! - **`TracingReporter`**: a [`Reporter`] that turns every report into an
//!   `ERROR` event, useful in development or as a fallback sink.
//!
//! # Example
//!
//! ```ignore
//! use state_reporter::tracing::TracingDecycledExt;
//!
//! tracing::debug!(state = %state.tracing_decycled(), "store updated");
//! ```

use tracing::{
    error,
    field::{DisplayValue, display},
};

use crate::{
    decycle::decycle,
    interceptor::{BoxError, Failure, ReportContext, Reporter},
    value::Value,
};

const ABSENT: &str = "undefined";

/// Extension trait for logging values as decycled JSON display strings.
pub trait TracingDecycledExt {
    fn tracing_decycled(&self) -> DisplayValue<String>;
}

impl TracingDecycledExt for Value {
    fn tracing_decycled(&self) -> DisplayValue<String> {
        display(decycle(self).unwrap_or_else(|| ABSENT.to_owned()))
    }
}

/// Reports failures as `tracing` events at `ERROR` level.
///
/// The payload of a failure action is decycled but *not* sanitized; only the
/// state snapshot in the context goes through the configured redaction.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, failure: Failure<'_>, context: &ReportContext) -> Result<(), BoxError> {
        let state = context.state.as_deref().unwrap_or(ABSENT);
        match failure {
            Failure::Action { payload } => {
                error!(payload = %payload.tracing_decycled(), state, "failure action");
            }
            Failure::Forwarding { error } => {
                let action = context.action.as_deref().unwrap_or(ABSENT);
                error!(error = %error, action, state, "forwarding failed");
            }
        }
        Ok(())
    }
}
