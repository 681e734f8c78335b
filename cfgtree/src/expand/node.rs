//! Node aliasing for values of the form `%node...PATH%`.

use indexmap::IndexSet;
use tracing::{trace, warn};

use super::TreeExpander;
use super::pattern::{MacroPattern, MacroRef, ValueScan};
use crate::error::ConfigResult;
use crate::separator::{LevelMarker, Separator};
use crate::tree::{Attachment, Children, ConfigTree, NodeId};

/// Replaces values that consist of a single `%prefix...PATH%` macro with the
/// node at `PATH`.
///
/// The node is shared, not copied: it stays where it was and also becomes
/// reachable from the macro's position. A path naming a single empty value
/// yields a new empty node instead. A key is converted only when every one of
/// its values resolves; references that never resolve are left as they are
/// and logged.
#[derive(Debug, Clone)]
pub struct NodeExpander {
    pattern: MacroPattern,
    separator: Separator,
}

impl NodeExpander {
    /// Create an expander for `%prefix...%` values.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::InvalidPattern`] if the macro pattern
    /// cannot be built.
    pub fn new(prefix: &str, separator: Separator) -> ConfigResult<Self> {
        Self::with_marker(prefix, separator, LevelMarker::Separator)
    }

    /// Create an expander with an explicit level marker.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::InvalidPattern`] if the macro pattern
    /// cannot be built.
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

    fn lookup(&self, tree: &ConfigTree, scope: NodeId, path: &str) -> Option<Attachment> {
        if let Some(node) = tree.nodes(scope, path, self.separator).first() {
            return Some(Attachment::Shared(*node));
        }
        match tree.values(scope, path, self.separator) {
            [only] if only.is_empty() => Some(Attachment::Fresh),
            _ => None,
        }
    }

    fn resolve(
        &self,
        tree: &ConfigTree,
        from: NodeId,
        reference: &MacroRef<'_>,
    ) -> Option<Attachment> {
        let scope = reference.scope(tree, from)?;
        self.lookup(tree, scope, reference.path).or_else(|| {
            if scope == tree.root() {
                self.lookup(tree, from, reference.path)
            } else {
                None
            }
        })
    }

    /// Convert `key` under `node` if all of its values resolve.
    fn try_convert(&self, tree: &mut ConfigTree, node: NodeId, key: &str) -> ConfigResult<bool> {
        let Some(Children::Values(values)) = tree.child(node, key) else {
            return Ok(false);
        };
        let mut attachments = Vec::with_capacity(values.len());
        for value in values {
            let Some(reference) = self.pattern.match_whole(value) else {
                return Ok(false);
            };
            let Some(attachment) = self.resolve(tree, node, &reference) else {
                return Ok(false);
            };
            attachments.push(attachment);
        }
        trace!(key, count = attachments.len(), "injecting nodes");
        tree.values_to_nodes(node, key, &attachments)?;
        Ok(true)
    }
}

impl TreeExpander for NodeExpander {
    fn name(&self) -> &str {
        self.pattern.prefix()
    }

    fn expand(&self, tree: &mut ConfigTree) -> ConfigResult<()> {
        let mut pending: IndexSet<(NodeId, String)> = ValueScan::run(tree, &self.pattern, true)
            .into_iter()
            .map(|site| (site.node, site.key))
            .collect();
        loop {
            let before = pending.len();
            let mut unresolved = IndexSet::new();
            for (node, key) in pending {
                if !self.try_convert(tree, node, &key)? {
                    unresolved.insert((node, key));
                }
            }
            pending = unresolved;
            if pending.is_empty() || pending.len() == before {
                break;
            }
        }
        for (_, key) in &pending {
            warn!(key = %key, "node reference left unexpanded");
        }
        Ok(())
    }
}
