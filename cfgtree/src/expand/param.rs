//! Value interpolation for `%config...%` and `%param...%` macros.

use tracing::trace;

use super::TreeExpander;
use super::pattern::{MacroPattern, MacroRef, Site, ValueScan};
use crate::error::{ConfigError, ConfigResult};
use crate::separator::{LevelMarker, Separator};
use crate::tree::{ConfigTree, NodeId};

/// Replaces every embedded `%prefix...PATH%` with the first value at `PATH`.
///
/// Plain macros resolve from the root and fall back to the node holding the
/// value; `%prefix..PATH%` walks one parent up first, and every further
/// separator one more. A referenced value that contains macros of the same
/// family is expanded first, so the order of keys does not matter.
#[derive(Debug, Clone)]
pub struct ParamExpander {
    pattern: MacroPattern,
    separator: Separator,
}

impl ParamExpander {
    /// Expander for `%prefix...%` using separators as level markers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the macro pattern cannot be
    /// built.
    pub fn new(prefix: &str, separator: Separator) -> ConfigResult<Self> {
        Self::with_marker(prefix, separator, LevelMarker::Separator)
    }

    /// Expander for `%prefix...%` with an explicit level marker.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the macro pattern cannot be
    /// built.
    pub fn with_marker(
        prefix: &str,
        separator: Separator,
        marker: LevelMarker,
    ) -> ConfigResult<Self> {
        Ok(Self {
            pattern: MacroPattern::new(prefix, separator, marker)?,
            separator,
        })
    }

    fn locate_value(&self, tree: &ConfigTree, scope: NodeId, path: &str) -> Option<Site> {
        let (node, key) = tree.locate(scope, path, self.separator)?;
        tree.value(node, key, 0)?;
        Some(Site::new(node, key, 0))
    }

    fn resolve(&self, tree: &ConfigTree, site: &Site, reference: &MacroRef<'_>) -> Option<Site> {
        let scope = reference.scope(tree, site.node)?;
        self.locate_value(tree, scope, reference.path).or_else(|| {
            if scope == tree.root() {
                self.locate_value(tree, site.node, reference.path)
            } else {
                None
            }
        })
    }

    fn expand_site(
        &self,
        tree: &mut ConfigTree,
        site: &Site,
        stack: &mut Vec<Site>,
    ) -> ConfigResult<()> {
        let Some(value) = tree
            .value(site.node, &site.key, site.index)
            .map(str::to_owned)
        else {
            return Ok(());
        };
        let references = self.pattern.find_all(&value);
        if references.is_empty() {
            return Ok(());
        }
        if stack.contains(site) {
            return Err(cycle(stack, site));
        }
        stack.push(site.clone());

        let mut expanded = String::with_capacity(value.len());
        let mut last = 0;
        for reference in &references {
            let target = self
                .resolve(tree, site, reference)
                .ok_or_else(|| ConfigError::unresolved(&site.key, site.index, reference.text))?;
            self.expand_site(tree, &target, stack)?;
            let replacement = tree
                .value(target.node, &target.key, target.index)
                .unwrap_or_default();
            trace!(
                key = %site.key,
                reference = reference.text,
                replacement,
                "expanded value reference"
            );
            expanded.push_str(value.get(last..reference.start).unwrap_or_default());
            expanded.push_str(replacement);
            last = reference.end;
        }
        expanded.push_str(value.get(last..).unwrap_or_default());
        stack.pop();

        if let Some(slot) = tree.value_mut(site.node, &site.key, site.index) {
            *slot = expanded;
        }
        Ok(())
    }
}

fn cycle(stack: &[Site], repeated: &Site) -> ConfigError {
    let chain = stack
        .iter()
        .skip_while(|site| *site != repeated)
        .chain(std::iter::once(repeated))
        .map(|site| format!("{}[{}]", site.key, site.index))
        .collect::<Vec<_>>()
        .join(" -> ");
    ConfigError::CyclicReference { chain }
}

impl TreeExpander for ParamExpander {
    fn name(&self) -> &str {
        self.pattern.prefix()
    }

    fn expand(&self, tree: &mut ConfigTree) -> ConfigResult<()> {
        let sites = ValueScan::run(tree, &self.pattern, false);
        let mut stack = Vec::new();
        for site in &sites {
            self.expand_site(tree, site, &mut stack)?;
        }
        Ok(())
    }
}

