//! Failure reporting with safe state snapshots.
//!
//! This crate sits inside an application's state-update pipeline. When an
//! action represents a failure, it reports the failure to an error-tracking
//! service together with a snapshot of current state that is:
//!
//! - **sanitized**: sensitive dot paths are masked (or a custom transform runs)
//!   without touching the live state;
//! - **decycled**: encoded as JSON text where any node reached a second time
//!   is omitted, so self-referential state never breaks the report.
//!
//! What this crate does:
//! - defines a shared-node [`Value`] model where identity and cycles are explicit
//! - provides [`set_at_path`], [`sanitize`] and [`decycle`] as standalone functions
//! - provides the [`Interceptor`] that wires them to a [`Reporter`] and a [`StateSource`]
//! - provides logging integrations (`tracing`, and `slog` behind a feature flag)
//!
//! What it does not do:
//! - transport reports anywhere, retry them, or guarantee delivery
//! - validate or transform action payloads

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

// Module declarations
mod decycle;
mod interceptor;
mod sanitize;
#[cfg(feature = "slog")]
pub mod slog;
pub mod tracing;
mod value;

pub use decycle::{Decycled, decycle};
pub use interceptor::{
    Action, BoxError, ConfigError, Dispatched, Failure, FnReporter, Interceptor, ReportContext,
    Reporter, ReporterConfig, StateSource, reporter_fn,
};
pub use sanitize::{
    KeyPath, MASK, RedactionSpec, Transform, sanitize, sanitize_with_mask, set_at_path,
};
pub use value::{Map, NodeId, Value};

pub use crate::tracing::{TracingDecycledExt, TracingReporter};
