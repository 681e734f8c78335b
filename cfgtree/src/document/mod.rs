//! Generic ordered documents produced by the format parsers.
//!
//! Every supported format is read into a [`Document`]: an ordered list of
//! `(key, node)` pairs where keys may repeat and each node is either a scalar
//! string or a nested document. The tree builder only ever sees this shape.

mod de;
#[cfg(feature = "toml")]
mod toml;
#[cfg(feature = "xml")]
mod xml;

use std::fmt;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// One entry of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNode {
    /// A leaf value.
    Scalar(String),
    /// A nested document.
    Nested(Document),
}

/// An ordered list of keyed entries; keys may repeat.
///
/// # Examples
///
/// ```
/// use cfgtree::Document;
///
/// # fn main() -> cfgtree::ConfigResult<()> {
/// let doc = Document::parse(r#"{"System": {"SessionId": "STH", "Instance": 20}}"#)?;
/// let expected = Document::new().with_node(
///     "System",
///     Document::new()
///         .with_value("SessionId", "STH")
///         .with_value("Instance", "20"),
/// );
/// assert_eq!(doc, expected);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    entries: Vec<(String, DocumentNode)>,
}

impl Document {
    /// An empty document.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Whether the document has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in source order.
    #[must_use]
    pub fn entries(&self) -> &[(String, DocumentNode)] {
        &self.entries
    }

    /// Append an entry.
    pub fn push(&mut self, key: impl Into<String>, node: DocumentNode) {
        self.entries.push((key.into(), node));
    }

    /// Append a scalar entry.
    pub fn push_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.push(key, DocumentNode::Scalar(value.into()));
    }

    /// Append a nested entry.
    pub fn push_node(&mut self, key: impl Into<String>, node: Self) {
        self.push(key, DocumentNode::Nested(node));
    }

    /// Builder form of [`Document::push_value`].
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_value(key, value);
        self
    }

    /// Builder form of [`Document::push_node`].
    #[must_use]
    pub fn with_node(mut self, key: impl Into<String>, node: Self) -> Self {
        self.push_node(key, node);
        self
    }

    /// Parse `text`, picking the format with [`Format::detect`].
    ///
    /// Blank text yields an empty document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Document`] when the text is malformed or the
    /// detected format was compiled out.
    pub fn parse(text: &str) -> ConfigResult<Self> {
        let Some(format) = Format::detect(text) else {
            return Ok(Self::new());
        };
        debug!(%format, "parsing document");
        format.parse(text.trim())
    }
}

impl IntoIterator for Document {
    type Item = (String, DocumentNode);
    type IntoIter = std::vec::IntoIter<(String, DocumentNode)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON objects and arrays.
    Json,
    /// TOML tables.
    Toml,
    /// XML elements.
    Xml,
}

impl Format {
    /// Guess the format from the first non-blank character.
    ///
    /// `<` means XML, `{` means JSON and anything else is read as TOML.
    /// Returns `None` for blank text.
    #[must_use]
    pub fn detect(text: &str) -> Option<Self> {
        match text.trim_start().chars().next()? {
            '<' => Some(Self::Xml),
            '{' => Some(Self::Json),
            _ => Some(Self::Toml),
        }
    }

    /// Name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Xml => "xml",
        }
    }

    /// Parse `text` as this format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Document`] when the text is malformed or
    /// support for the format was compiled out.
    pub fn parse(self, text: &str) -> ConfigResult<Document> {
        match self {
            Self::Json => parse_json(text),
            Self::Toml => parse_toml(text),
            Self::Xml => parse_xml(text),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(not(all(feature = "json", feature = "toml", feature = "xml")))]
fn disabled(format: Format) -> ConfigError {
    ConfigError::document(
        format.name(),
        format!("support for {format} documents is disabled; enable the `{format}` feature"),
    )
}

#[cfg(feature = "json")]
fn parse_json(text: &str) -> ConfigResult<Document> {
    serde_json::from_str(text).map_err(ConfigError::from)
}

#[cfg(not(feature = "json"))]
fn parse_json(_text: &str) -> ConfigResult<Document> {
    Err(disabled(Format::Json))
}

#[cfg(feature = "toml")]
fn parse_toml(text: &str) -> ConfigResult<Document> {
    self::toml::parse(text)
}

#[cfg(not(feature = "toml"))]
fn parse_toml(_text: &str) -> ConfigResult<Document> {
    Err(disabled(Format::Toml))
}

#[cfg(feature = "xml")]
fn parse_xml(text: &str) -> ConfigResult<Document> {
    xml::parse(text)
}

#[cfg(not(feature = "xml"))]
fn parse_xml(_text: &str) -> ConfigResult<Document> {
    Err(disabled(Format::Xml))
}

#[cfg(test)]
mod tests;
