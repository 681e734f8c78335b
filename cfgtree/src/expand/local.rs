//! Legacy `%local...PATH%` interpolation.

use super::TreeExpander;
use super::pattern::{MacroPattern, ValueScan, walk_up};
use crate::error::ConfigResult;
use crate::separator::{LevelMarker, Separator};
use crate::tree::ConfigTree;

/// Replaces `%local.PATH%` with the first value at `PATH` below the node
/// holding the macro; every extra separator after the prefix walks one level
/// up first.
///
/// There is no root fallback, and a reference that does not resolve becomes
/// the empty string. Not part of [`crate::Pipeline::standard`].
#[derive(Debug, Clone)]
pub struct LocalExpander {
    pattern: MacroPattern,
    separator: Separator,
}

impl LocalExpander {
    /// Create an expander for `%local...%` values.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::InvalidPattern`] if the macro pattern
    /// cannot be built.
    pub fn new(separator: Separator) -> ConfigResult<Self> {
        Ok(Self {
            pattern: MacroPattern::new("local", separator, LevelMarker::Separator)?,
            separator,
        })
    }
}

impl TreeExpander for LocalExpander {
    fn name(&self) -> &str {
        self.pattern.prefix()
    }

    fn expand(&self, tree: &mut ConfigTree) -> ConfigResult<()> {
        for site in ValueScan::run(tree, &self.pattern, false) {
            let Some(value) = tree.value(site.node, &site.key, site.index) else {
                continue;
            };
            let mut expanded = String::with_capacity(value.len());
            let mut last = 0;
            for reference in self.pattern.find_all(value) {
                let replacement = walk_up(tree, site.node, reference.levels)
                    .and_then(|scope| tree.values(scope, reference.path, self.separator).first())
                    .map_or("", String::as_str);
                expanded.push_str(value.get(last..reference.start).unwrap_or_default());
                expanded.push_str(replacement);
                last = reference.end;
            }
            expanded.push_str(value.get(last..).unwrap_or_default());
            if let Some(slot) = tree.value_mut(site.node, &site.key, site.index) {
                *slot = expanded;
            }
        }
        Ok(())
    }
}
