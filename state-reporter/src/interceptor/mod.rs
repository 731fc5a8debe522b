//! The pipeline interceptor.
//!
//! [`Interceptor::dispatch`] sits between the pipeline and the next handler:
//!
//! 1. Regular actions are forwarded unchanged.
//! 2. Failure actions trigger a report carrying the action payload and a
//!    sanitized, decycled state snapshot, and are then forwarded unchanged,
//!    whether or not the report succeeded.
//! 3. With forwarding wrapped, an error returned by the next handler for a
//!    regular action is reported too (along with the decycled action) and the
//!    action is considered handled.

mod action;
mod collaborators;
mod config;

use std::{error::Error, fmt};

pub use action::Action;
pub use collaborators::{
    BoxError, Failure, FnReporter, ReportContext, Reporter, StateSource, reporter_fn,
};
pub use config::{ConfigError, ReporterConfig};
use tracing::{debug, warn};

use crate::{
    decycle::decycle,
    sanitize::{KeyPath, MASK, RedactionSpec, sanitize_with_mask},
    value::Value,
};

type FailurePredicate = Box<dyn Fn(&Action) -> bool>;

/// Outcome of a dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatched<T> {
    /// The next handler ran and returned this.
    Forwarded(T),
    /// The next handler failed, and the failure was reported instead of returned.
    Trapped,
}

impl<T> Dispatched<T> {
    pub fn forwarded(self) -> Option<T> {
        match self {
            Self::Forwarded(output) => Some(output),
            Self::Trapped => None,
        }
    }
}

// =============================================================================
// Interceptor
// =============================================================================

/// Reports failures seen in the update pipeline.
///
/// ```rust
/// use serde_json::json;
/// use state_reporter::{
///     Action, BoxError, Dispatched, Failure, Interceptor, ReportContext, Reporter, Value,
/// };
///
/// struct Stderr;
///
/// impl Reporter for Stderr {
///     fn report(&self, failure: Failure<'_>, context: &ReportContext) -> Result<(), BoxError> {
///         eprintln!("{failure} state={:?}", context.state);
///         Ok(())
///     }
/// }
///
/// let state = Value::from(json!({"session": {"token": "sk_live"}}));
/// let interceptor = Interceptor::new(Stderr, move || state.clone())
///     .with_paths(["session.token"]);
///
/// let action = Action::new("LOGIN_FAILED").with_payload("bad password").failed();
/// let result = interceptor.dispatch(action, |action| Ok::<_, std::io::Error>(action.kind));
/// assert_eq!(result.ok(), Some(Dispatched::Forwarded("LOGIN_FAILED".to_string())));
/// ```
pub struct Interceptor<R, S> {
    reporter: R,
    state: S,
    redaction: Option<RedactionSpec>,
    mask: Value,
    wrap_forwarding: bool,
    is_failure: FailurePredicate,
}

impl<R, S> Interceptor<R, S>
where
    R: Reporter,
    S: StateSource,
{
    /// Creates an interceptor that reports unmasked state, forwards without a
    /// trap, and treats actions with `error == true` as failures.
    pub fn new(reporter: R, state: S) -> Self {
        Self {
            reporter,
            state,
            redaction: None,
            mask: Value::from(MASK),
            wrap_forwarding: false,
            is_failure: Box::new(Action::is_error),
        }
    }

    /// Creates an interceptor from declarative options.
    ///
    /// The config is validated first, so a hand-built config is held to the
    /// same rules as one parsed with [`ReporterConfig::from_json_str`].
    pub fn from_config(
        reporter: R,
        state: S,
        config: &ReporterConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut interceptor = Self::new(reporter, state).wrap_forwarding(config.wrap_forwarding);
        interceptor.redaction = config.redaction();
        if let Some(mask) = &config.mask {
            interceptor.mask = Value::from(mask.as_str());
        }
        Ok(interceptor)
    }

    #[must_use]
    pub fn with_redaction(mut self, spec: RedactionSpec) -> Self {
        self.redaction = Some(spec);
        self
    }

    /// Masks these dot paths in every snapshot.
    #[must_use]
    pub fn with_paths<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<KeyPath>,
    {
        self.with_redaction(RedactionSpec::paths(paths))
    }

    /// Replaces path masking with a custom transform.
    #[must_use]
    pub fn with_transform<F>(self, transform: F) -> Self
    where
        F: Fn(&Value) -> Value + 'static,
    {
        self.with_redaction(RedactionSpec::transform(transform))
    }

    #[must_use]
    pub fn with_mask(mut self, mask: impl Into<Value>) -> Self {
        self.mask = mask.into();
        self
    }

    #[must_use]
    pub fn wrap_forwarding(mut self, enabled: bool) -> Self {
        self.wrap_forwarding = enabled;
        self
    }

    #[must_use]
    pub fn with_failure_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Action) -> bool + 'static,
    {
        self.is_failure = Box::new(predicate);
        self
    }

    /// Reads current state once and returns it sanitized and decycled.
    pub fn snapshot(&self) -> Option<String> {
        let state = self.state.current_state();
        match &self.redaction {
            Some(spec) => decycle(&sanitize_with_mask(&state, spec, &self.mask)),
            None => decycle(&state),
        }
    }

    /// Passes `action` to `next`, reporting it first if it is a failure.
    ///
    /// Without wrapped forwarding, an error from `next` is returned as-is.
    /// With wrapped forwarding, an error from `next` for a regular action is
    /// reported and the result is [`Dispatched::Trapped`].
    pub fn dispatch<T, E, N>(&self, action: Action, next: N) -> Result<Dispatched<T>, E>
    where
        N: FnOnce(Action) -> Result<T, E>,
        E: Error + 'static,
    {
        if (self.is_failure)(&action) {
            debug!(action = %action.kind, "reporting failure action");
            let context = ReportContext {
                state: self.snapshot(),
                action: None,
            };
            self.deliver(
                Failure::Action {
                    payload: &action.payload,
                },
                &context,
            );
            return next(action).map(Dispatched::Forwarded);
        }

        if !self.wrap_forwarding {
            return next(action).map(Dispatched::Forwarded);
        }

        let retained = action.clone();
        match next(action) {
            Ok(output) => Ok(Dispatched::Forwarded(output)),
            Err(err) => {
                debug!(action = %retained.kind, error = %err, "trapped forwarding error");
                let context = ReportContext {
                    state: self.snapshot(),
                    action: decycle(&retained.to_value()),
                };
                self.deliver(Failure::Forwarding { error: &err }, &context);
                Ok(Dispatched::Trapped)
            }
        }
    }

    fn deliver(&self, failure: Failure<'_>, context: &ReportContext) {
        if let Err(err) = self.reporter.report(failure, context) {
            warn!(error = %err, "reporter failed; continuing");
        }
    }
}

impl<R, S> fmt::Debug for Interceptor<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("redaction", &self.redaction)
            .field("mask", &self.mask)
            .field("wrap_forwarding", &self.wrap_forwarding)
            .finish_non_exhaustive()
    }
}
