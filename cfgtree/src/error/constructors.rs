//! Convenience constructors for `ConfigError`.

use camino::Utf8Path;

use super::{ChildKind, ConfigError};

impl ConfigError {
    /// Wrap an I/O failure for the source at `path`.
    #[must_use]
    pub fn io(path: &Utf8Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Wrap a parser failure for the named format.
    #[must_use]
    pub fn document<E>(format: &'static str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Document {
            format,
            source: source.into(),
        }
    }

    /// Report that `key` holds `existing` children while `requested` was added.
    #[must_use]
    pub fn kind_mismatch(
        key: impl Into<String>,
        existing: ChildKind,
        requested: ChildKind,
    ) -> Self {
        Self::KindMismatch {
            key: key.into(),
            existing,
            requested,
        }
    }

    /// Report an unresolved value macro.
    #[must_use]
    pub fn unresolved(key: impl Into<String>, index: usize, reference: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            key: key.into(),
            index,
            reference: reference.into(),
        }
    }

    /// Report a failed typed read of `value` at `path`.
    #[must_use]
    pub fn conversion(
        value: impl Into<String>,
        path: impl Into<String>,
        target: &'static str,
    ) -> Self {
        Self::Conversion {
            value: value.into(),
            path: path.into(),
            target,
        }
    }

    /// Report a macro pattern that failed to compile.
    #[must_use]
    pub fn invalid_pattern(pattern: &str, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_owned(),
            source: Box::new(source),
        }
    }
}
