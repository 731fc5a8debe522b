//! Declarative interceptor configuration.
//!
//! Transforms cannot be expressed in data, so a config only covers the path
//! form of [`RedactionSpec`]; attach a transform with
//! [`super::Interceptor::with_transform`] instead.

use serde::Deserialize;
use thiserror::Error;

use crate::sanitize::{KeyPath, RedactionSpec};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed reporter configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("key path {path:?} contains an empty segment")]
    EmptySegment { path: String },
}

/// Options recognized by the interceptor.
///
/// ```rust
/// use state_reporter::ReporterConfig;
///
/// let config = ReporterConfig::from_json_str(
///     r#"{"key_paths": ["session.token"], "wrap_forwarding": true}"#,
/// )?;
/// assert!(config.wrap_forwarding);
/// # Ok::<(), state_reporter::ConfigError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReporterConfig {
    /// Dot paths to mask. `None` serializes state without masking.
    pub key_paths: Option<Vec<String>>,
    /// Trap and report errors returned while forwarding regular actions.
    pub wrap_forwarding: bool,
    /// Replacement for masked values; defaults to [`crate::MASK`].
    pub mask: Option<String>,
}

impl ReporterConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects key paths with empty segments such as `"a..b"` or `"a."`.
    ///
    /// Those are accepted by [`KeyPath::parse`] but are almost always typos in
    /// a configuration file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in self.key_paths.iter().flatten() {
            if KeyPath::parse(path).has_empty_segment() {
                return Err(ConfigError::EmptySegment { path: path.clone() });
            }
        }
        Ok(())
    }

    pub fn redaction(&self) -> Option<RedactionSpec> {
        self.key_paths.as_ref().map(RedactionSpec::paths)
    }
}
