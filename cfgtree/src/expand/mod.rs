//! Macro expansion passes.
//!
//! Expansion happens in two stages. [`ContentExpander`]s rewrite the raw
//! text of every document before it is parsed; [`TreeExpander`]s run once,
//! in order, over the merged tree. [`Pipeline::standard`] assembles the
//! usual sequence:
//!
//! 1. `%env.NAME%` on raw text ([`EnvExpander`]),
//! 2. `%config.PATH%` value interpolation ([`ParamExpander`]),
//! 3. `%template.PATH%` instantiation ([`TemplateExpander`]),
//! 4. `%param.PATH%` value interpolation ([`ParamExpander`]),
//! 5. `%node.PATH%` aliasing ([`NodeExpander`]).

mod env;
mod local;
mod node;
mod param;
mod pattern;
mod template;

use tracing::debug;

use crate::error::ConfigResult;
use crate::separator::{LevelMarker, Separator};
use crate::tree::ConfigTree;

pub use env::{EnvExpander, EnvLookup, ProcessEnv};
pub use local::LocalExpander;
pub use node::NodeExpander;
pub use param::ParamExpander;
pub use pattern::{MacroPattern, MacroRef};
pub use template::TemplateExpander;

/// A pass over the raw text of one document.
pub trait ContentExpander {
    /// Return the rewritten text.
    fn expand(&self, contents: &str) -> String;
}

impl<F> ContentExpander for F
where
    F: Fn(&str) -> String,
{
    fn expand(&self, contents: &str) -> String {
        self(contents)
    }
}

/// A pass over the merged tree.
pub trait TreeExpander {
    /// Name used in logs.
    fn name(&self) -> &str {
        "custom"
    }

    /// Rewrite `tree` in place.
    ///
    /// # Errors
    ///
    /// Implementations return an error when a macro cannot be resolved; the
    /// whole build is abandoned.
    fn expand(&self, tree: &mut ConfigTree) -> ConfigResult<()>;
}

impl<F> TreeExpander for F
where
    F: Fn(&mut ConfigTree) -> ConfigResult<()>,
{
    fn expand(&self, tree: &mut ConfigTree) -> ConfigResult<()> {
        self(tree)
    }
}

/// Ordered lists of text and tree passes.
#[derive(Default)]
pub struct Pipeline {
    pre: Vec<Box<dyn ContentExpander>>,
    post: Vec<Box<dyn TreeExpander>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("pre", &self.pre.len())
            .field(
                "post",
                &self.post.iter().map(|pass| pass.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Pipeline {
    /// A pipeline without passes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The default sequence: `env`, then `config`, `template`, `param` and
    /// `node`, with `env` reading from `env`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::InvalidPattern`] if a macro pattern
    /// cannot be built for `separator`.
    pub fn standard<L>(separator: Separator, env: L) -> ConfigResult<Self>
    where
        L: EnvLookup + 'static,
    {
        Ok(Self::new()
            .with_pre(EnvExpander::new(env)?)
            .with_post(ParamExpander::new("config", separator)?)
            .with_post(TemplateExpander::new("template", separator, LevelMarker::Separator)?)
            .with_post(ParamExpander::new("param", separator)?)
            .with_post(NodeExpander::new("node", separator)?))
    }

    /// Append a text pass.
    #[must_use]
    pub fn with_pre(mut self, pass: impl ContentExpander + 'static) -> Self {
        self.pre.push(Box::new(pass));
        self
    }

    /// Append a tree pass.
    #[must_use]
    pub fn with_post(mut self, pass: impl TreeExpander + 'static) -> Self {
        self.post.push(Box::new(pass));
        self
    }

    /// Run every text pass over `contents`.
    #[must_use]
    pub fn expand_contents(&self, contents: &str) -> String {
        self.pre
            .iter()
            .fold(contents.to_owned(), |text, pass| pass.expand(&text))
    }

    /// Run every tree pass over `tree`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by a pass.
    pub fn expand_tree(&self, tree: &mut ConfigTree) -> ConfigResult<()> {
        for pass in &self.post {
            debug!(pass = pass.name(), "running tree pass");
            pass.expand(tree)?;
        }
        Ok(())
    }
}
