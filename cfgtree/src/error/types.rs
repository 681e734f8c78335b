//! Primary error enum for configuration trees.

use std::fmt;

use camino::Utf8PathBuf;
use thiserror::Error;

/// The two kinds of child list a key can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    /// A list of nested scopes.
    Nodes,
    /// A list of leaf strings.
    Values,
}

impl fmt::Display for ChildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Nodes => "node list",
            Self::Values => "value list",
        })
    }
}

/// Errors that can occur while composing or reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Error parsing command-line arguments.
    #[error("Failed to parse command-line arguments: {0}")]
    CliParsing(#[from] Box<clap::Error>),

    /// A configuration source could not be read.
    #[error("Failed to read configuration source '{path}': {source}")]
    Io {
        /// Path of the source that failed to load.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A document could not be parsed into a tree.
    #[error("Failed to parse {format} document: {source}")]
    Document {
        /// Name of the document format being parsed.
        format: &'static str,
        /// Error reported by the format parser.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A key already holds children of the other kind.
    #[error("key '{key}' already holds a {existing}, cannot add a {requested}")]
    KindMismatch {
        /// Key whose kind conflicts.
        key: String,
        /// Kind already stored under the key.
        existing: ChildKind,
        /// Kind the caller tried to add.
        requested: ChildKind,
    },

    /// A value macro could not be resolved in any applicable scope.
    #[error("Could not resolve \"{reference}\" in '{key}'[{index}]")]
    UnresolvedReference {
        /// Key holding the value with the macro.
        key: String,
        /// Position of the value within the key's list.
        index: usize,
        /// Literal macro text that failed to resolve.
        reference: String,
    },

    /// A template instantiation site names a node that does not exist.
    #[error("Could not resolve \"{key}\"")]
    UnresolvedTemplate {
        /// Key of the instantiation site.
        key: String,
    },

    /// Value macros reference each other in a loop.
    #[error("cyclic reference detected: {chain}")]
    CyclicReference {
        /// Sites participating in the cycle, in resolution order.
        chain: String,
    },

    /// Template instantiation kept producing new sites.
    #[error("template '{key}' still unexpanded after {rounds} rounds")]
    TemplateDepth {
        /// A site left over after the final round.
        key: String,
        /// Number of rounds attempted.
        rounds: usize,
    },

    /// A value could not be converted to the requested type.
    #[error("Cannot convert '{value}' at '{path}' to {target}")]
    Conversion {
        /// Raw value found at the path.
        value: String,
        /// Path that was read.
        path: String,
        /// Name of the requested type.
        target: &'static str,
    },

    /// A macro pattern failed to compile.
    #[error("invalid macro pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern that failed to compile.
        pattern: String,
        /// Error returned by the regex engine.
        #[source]
        source: Box<regex::Error>,
    },
}
