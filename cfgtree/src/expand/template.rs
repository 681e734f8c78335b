//! Template instantiation for keys of the form `%template...PATH%`.
//!
//! A child whose key is a template macro marks an instantiation site. The
//! referenced node is cloned, the body nested under the macro key (if any) is
//! merged over the clone, and the result replaces the whole content of the
//! node that held the site. Any other key of that node, including a second
//! site, is dropped with a warning.

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::TreeExpander;
use super::pattern::MacroPattern;
use crate::error::{ConfigError, ConfigResult};
use crate::separator::{LevelMarker, Separator};
use crate::tree::{ConfigTree, NodeId, NodeSite, TreeVisitor, ValueSite, Walk};

/// Rounds attempted before giving up on templates that keep producing sites.
const DEFAULT_MAX_ROUNDS: usize = 16;

/// Expands `%prefix...PATH%` keys into copies of the node at `PATH`.
#[derive(Debug, Clone)]
pub struct TemplateExpander {
    pattern: MacroPattern,
    separator: Separator,
    max_rounds: usize,
}

#[derive(Debug, Clone, Copy)]
enum Source {
    Template(NodeId),
    Placeholder,
}

struct SiteScan<'p> {
    pattern: &'p MacroPattern,
    sites: Vec<(NodeId, String)>,
}

impl SiteScan<'_> {
    fn record(&mut self, parent: NodeId, key: &str) -> bool {
        if self.pattern.match_whole(key).is_none() {
            return false;
        }
        if !self
            .sites
            .iter()
            .any(|(node, existing)| *node == parent && existing == key)
        {
            self.sites.push((parent, key.to_owned()));
        }
        true
    }
}

impl TreeVisitor for SiteScan<'_> {
    fn visit_value(&mut self, site: ValueSite<'_>, _value: &mut String) {
        self.record(site.parent, site.key);
    }

    fn visit_node(&mut self, site: NodeSite<'_>) -> Walk {
        if self.record(site.parent, site.key) {
            Walk::Skip
        } else {
            Walk::Descend
        }
    }
}

impl TemplateExpander {
    /// Create an expander for `%prefix...%` keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the macro pattern cannot be
    /// built.
    pub fn new(prefix: &str, separator: Separator, marker: LevelMarker) -> ConfigResult<Self> {
        Ok(Self {
            pattern: MacroPattern::new(prefix, separator, marker)?,
            separator,
            max_rounds: DEFAULT_MAX_ROUNDS,
        })
    }

    /// Limit the number of instantiation rounds.
    #[must_use]
    pub const fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    fn scan(&self, tree: &mut ConfigTree) -> Vec<(NodeId, String)> {
        let mut scan = SiteScan {
            pattern: &self.pattern,
            sites: Vec::new(),
        };
        tree.accept(tree.root(), &mut scan);
        scan.sites
    }

    fn lookup(&self, tree: &ConfigTree, scope: NodeId, path: &str) -> Option<Source> {
        if let Some(node) = tree.nodes(scope, path, self.separator).first() {
            return Some(Source::Template(*node));
        }
        match tree.values(scope, path, self.separator) {
            [only] if only.is_empty() => Some(Source::Placeholder),
            _ => None,
        }
    }

    fn resolve(&self, tree: &ConfigTree, parent: NodeId, key: &str) -> ConfigResult<Source> {
        let unresolved = || ConfigError::UnresolvedTemplate {
            key: key.to_owned(),
        };
        let reference = self.pattern.match_whole(key).ok_or_else(unresolved)?;
        let scope = reference.scope(tree, parent).ok_or_else(unresolved)?;
        self.lookup(tree, scope, reference.path)
            .or_else(|| {
                if scope == tree.root() {
                    self.lookup(tree, parent, reference.path)
                } else {
                    None
                }
            })
            .ok_or_else(unresolved)
    }

    fn instantiate(tree: &mut ConfigTree, parent: NodeId, key: &str, source: Source) {
        let instance = match source {
            Source::Template(template) => tree.clone_subtree(template),
            Source::Placeholder => tree.create_node(),
        };
        if let Some(body) = tree
            .child(parent, key)
            .and_then(|children| children.nodes().first().copied())
        {
            tree.overwrite_node(instance, body);
        }
        for (discarded, _) in tree.children(parent).filter(|(name, _)| *name != key) {
            warn!(key = %discarded, site = key, "key replaced by a template instance");
        }
        tree.swap_children(parent, instance);
    }
}

impl TreeExpander for TemplateExpander {
    fn name(&self) -> &str {
        self.pattern.prefix()
    }

    fn expand(&self, tree: &mut ConfigTree) -> ConfigResult<()> {
        for round in 0..self.max_rounds {
            let sites = self.scan(tree);
            if sites.is_empty() {
                return Ok(());
            }
            debug!(round, sites = sites.len(), "instantiating templates");

            let mut replacements: IndexMap<NodeId, (String, Source)> = IndexMap::new();
            for (parent, key) in sites {
                let source = self.resolve(tree, parent, &key)?;
                replacements.insert(parent, (key, source));
            }
            for (parent, (key, source)) in replacements {
                Self::instantiate(tree, parent, &key, source);
            }
        }
        match self.scan(tree).into_iter().next() {
            None => Ok(()),
            Some((_, key)) => Err(ConfigError::TemplateDepth {
                key,
                rounds: self.max_rounds,
            }),
        }
    }
}
