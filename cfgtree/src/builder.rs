//! Turning documents into one merged, expanded tree.

use std::collections::VecDeque;

use tracing::debug;

use crate::config::Config;
use crate::document::{Document, DocumentNode};
use crate::error::ConfigResult;
use crate::expand::{ContentExpander, Pipeline, TreeExpander};
use crate::separator::{ArrayKey, Separator};
use crate::tree::ConfigTree;

impl ConfigTree {
    /// Build a tree from `document`, breadth first.
    ///
    /// Keys that are empty or start with `array_key` are stored under the
    /// empty key. Nested documents without entries become the empty value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::KindMismatch`] when one key holds both
    /// nested and scalar entries.
    pub fn from_document(document: Document, array_key: ArrayKey) -> ConfigResult<Self> {
        let mut tree = Self::new();
        let mut queue = VecDeque::from([(tree.root(), document)]);
        while let Some((node, entries)) = queue.pop_front() {
            for (name, entry) in entries {
                let key = if array_key.is_anonymous(&name) {
                    String::new()
                } else {
                    name
                };
                match entry {
                    DocumentNode::Nested(children) if !children.is_empty() => {
                        let child = tree.add_node(node, key)?;
                        queue.push_back((child, children));
                    }
                    DocumentNode::Nested(_) => tree.set_value(node, key, "")?,
                    DocumentNode::Scalar(value) => tree.set_value(node, key, value)?,
                }
            }
        }
        Ok(tree)
    }
}

/// Builds a [`Config`] from document texts.
///
/// Each text runs through the text passes, is parsed and turned into a tree;
/// the trees are merged in order with [`ConfigTree::overwrite`], so later
/// documents win. The tree passes then run once over the merged result.
///
/// # Examples
///
/// ```
/// use cfgtree::{ConfigBuilder, ParamExpander, Separator};
///
/// # fn main() -> cfgtree::ConfigResult<()> {
/// let config = ConfigBuilder::new()
///     .with_post_expander(ParamExpander::new("config", Separator::default())?)
///     .build([
///         r#"{"System": {"Id": "STH", "Unique": "%config.System.Id%-1"}}"#,
///         r#"{"System": {"Id": "ABC"}}"#,
///     ])?;
///
/// assert_eq!(config.get::<String>("System.Unique")?.as_deref(), Some("ABC-1"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    separator: Separator,
    array_key: ArrayKey,
    pipeline: Pipeline,
}

impl ConfigBuilder {
    /// A builder with `.` as separator and array key and no passes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path separator.
    #[must_use]
    pub const fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Set the array key.
    #[must_use]
    pub const fn with_array_key(mut self, array_key: ArrayKey) -> Self {
        self.array_key = array_key;
        self
    }

    /// Replace all passes.
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Append a text pass.
    #[must_use]
    pub fn with_pre_expander(mut self, pass: impl ContentExpander + 'static) -> Self {
        self.pipeline = self.pipeline.with_pre(pass);
        self
    }

    /// Append a tree pass.
    #[must_use]
    pub fn with_post_expander(mut self, pass: impl TreeExpander + 'static) -> Self {
        self.pipeline = self.pipeline.with_post(pass);
        self
    }

    /// The configured separator.
    #[must_use]
    pub const fn separator(&self) -> Separator {
        self.separator
    }

    /// Merge `documents` in order without running any pass.
    ///
    /// Returns `None` when there are no documents.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::KindMismatch`] when a document mixes
    /// nested and scalar entries under one key.
    pub fn merge_documents<I>(&self, documents: I) -> ConfigResult<Option<ConfigTree>>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut merged: Option<ConfigTree> = None;
        for document in documents {
            let tree = ConfigTree::from_document(document, self.array_key)?;
            match merged.as_mut() {
                Some(accumulated) => accumulated.overwrite(tree),
                None => merged = Some(tree),
            }
        }
        Ok(merged)
    }

    /// Run the text passes, parse, merge and run the tree passes.
    ///
    /// Returns `None` when `contents` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Document`] for malformed text and any
    /// error raised by a tree pass.
    pub fn build_tree<I, S>(&self, contents: I) -> ConfigResult<Option<ConfigTree>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let documents = contents
            .into_iter()
            .map(|text| Document::parse(&self.pipeline.expand_contents(text.as_ref())))
            .collect::<ConfigResult<Vec<_>>>()?;
        debug!(documents = documents.len(), "merging documents");
        let mut merged = self.merge_documents(documents)?;
        if let Some(tree) = merged.as_mut()
            && !tree.is_empty(tree.root())
        {
            self.pipeline.expand_tree(tree)?;
        }
        Ok(merged)
    }

    /// Like [`ConfigBuilder::build_tree`], wrapped in a [`Config`].
    ///
    /// With no documents the result is uninitialised (see
    /// [`Config::is_initialized`]).
    ///
    /// # Errors
    ///
    /// See [`ConfigBuilder::build_tree`].
    pub fn build<I, S>(&self, contents: I) -> ConfigResult<Config>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.build_tree(contents)?.map_or_else(
            || Config::uninitialized(self.separator),
            |tree| Config::new(tree, self.separator),
        ))
    }
}
