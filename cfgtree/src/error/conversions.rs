//! Conversions from external error types into `ConfigError`.

use super::ConfigError;

impl From<clap::Error> for ConfigError {
    fn from(e: clap::Error) -> Self {
        Self::CliParsing(e.into())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::document("json", e)
    }
}
