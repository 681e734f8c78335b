//! Error types produced while building, expanding and reading configuration trees.

mod constructors;
mod conversions;
mod helpers;
mod types;

pub use helpers::is_display_request;
pub use types::{ChildKind, ConfigError};

/// Result alias used throughout the crate.
pub type ConfigResult<T> = Result<T, ConfigError>;
