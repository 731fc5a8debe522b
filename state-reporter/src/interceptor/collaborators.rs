//! Traits for the systems the interceptor talks to.
//!
//! - [`Reporter`]: the external error-tracking service; [`reporter_fn`] turns
//!   a closure into one
//! - [`StateSource`]: the store holding current application state

use std::{error::Error, fmt, rc::Rc};

use serde::Serialize;

use crate::value::Value;

/// Error type returned by collaborators.
pub type BoxError = Box<dyn Error + Send + Sync>;

// =============================================================================
// Failure / ReportContext
// =============================================================================

/// What went wrong, as handed to a [`Reporter`].
#[derive(Clone, Copy, Debug)]
pub enum Failure<'a> {
    /// A failure action passed through the pipeline; carries its payload.
    Action { payload: &'a Value },
    /// Forwarding a regular action failed (only when forwarding is wrapped).
    Forwarding { error: &'a (dyn Error + 'static) },
}

impl fmt::Display for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action { payload } => write!(f, "failure action: {payload}"),
            Self::Forwarding { error } => write!(f, "forwarding failed: {error}"),
        }
    }
}

/// Serialized context attached to every report.
///
/// `state` is the sanitized, decycled snapshot; it is `None` only when the
/// state source returned `Undefined`. `action` is set for forwarding failures.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReportContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

// =============================================================================
// Reporter
// =============================================================================

/// The external error-tracking service.
///
/// Errors returned here are logged and otherwise ignored by the interceptor;
/// delivery guarantees are the implementation's business.
pub trait Reporter {
    fn report(&self, failure: Failure<'_>, context: &ReportContext) -> Result<(), BoxError>;
}

impl<T: Reporter + ?Sized> Reporter for &T {
    fn report(&self, failure: Failure<'_>, context: &ReportContext) -> Result<(), BoxError> {
        (**self).report(failure, context)
    }
}

impl<T: Reporter + ?Sized> Reporter for Box<T> {
    fn report(&self, failure: Failure<'_>, context: &ReportContext) -> Result<(), BoxError> {
        (**self).report(failure, context)
    }
}

impl<T: Reporter + ?Sized> Reporter for Rc<T> {
    fn report(&self, failure: Failure<'_>, context: &ReportContext) -> Result<(), BoxError> {
        (**self).report(failure, context)
    }
}

/// A [`Reporter`] backed by a closure. Built with [`reporter_fn`].
#[derive(Clone, Copy)]
pub struct FnReporter<F> {
    report: F,
}

/// Wraps a closure of the same shape as [`Reporter::report`] into a reporter.
///
/// ```rust
/// use state_reporter::{Failure, ReportContext, reporter_fn};
///
/// let reporter = reporter_fn(|failure: Failure<'_>, context: &ReportContext| {
///     eprintln!("{failure} {context:?}");
///     Ok(())
/// });
/// # let _ = reporter;
/// ```
pub fn reporter_fn<F>(report: F) -> FnReporter<F>
where
    F: Fn(Failure<'_>, &ReportContext) -> Result<(), BoxError>,
{
    FnReporter { report }
}

impl<F> Reporter for FnReporter<F>
where
    F: Fn(Failure<'_>, &ReportContext) -> Result<(), BoxError>,
{
    fn report(&self, failure: Failure<'_>, context: &ReportContext) -> Result<(), BoxError> {
        (self.report)(failure, context)
    }
}

impl<F> fmt::Debug for FnReporter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnReporter(..)")
    }
}

// =============================================================================
// StateSource
// =============================================================================

/// Where the interceptor reads current state from.
///
/// Called at most once per intercepted failure.
pub trait StateSource {
    fn current_state(&self) -> Value;
}

impl<F> StateSource for F
where
    F: Fn() -> Value,
{
    fn current_state(&self) -> Value {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_display_includes_details() {
        let payload = Value::from("bork");
        assert_eq!(
            Failure::Action { payload: &payload }.to_string(),
            r#"failure action: "bork""#
        );

        let error = std::io::Error::other("disk full");
        assert_eq!(
            Failure::Forwarding { error: &error }.to_string(),
            "forwarding failed: disk full"
        );
    }

    #[test]
    fn context_serializes_present_fields_only() {
        let context = ReportContext {
            state: Some("{}".into()),
            action: None,
        };
        assert_eq!(serde_json::to_string(&context).unwrap(), r#"{"state":"{}"}"#);
    }

    #[test]
    fn closures_become_reporters() {
        let seen = std::cell::Cell::new(0);
        let reporter = reporter_fn(|failure: Failure<'_>, context: &ReportContext| {
            assert!(matches!(failure, Failure::Action { .. }));
            assert_eq!(context.state.as_deref(), Some("{}"));
            seen.set(seen.get() + 1);
            Ok(())
        });

        let payload = Value::Null;
        let context = ReportContext {
            state: Some("{}".into()),
            action: None,
        };
        reporter.report(Failure::Action { payload: &payload }, &context).unwrap();
        assert_eq!(seen.get(), 1);
        assert_eq!(format!("{reporter:?}"), "FnReporter(..)");
    }

    #[test]
    fn closures_are_state_sources() {
        let source = || Value::from(5);
        assert_eq!(source.current_state().as_i64(), Some(5));
    }
}
