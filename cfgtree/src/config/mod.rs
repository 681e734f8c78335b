//! Read-only, path-addressed view over a finished tree.

mod convert;
mod paths;

use std::fmt;
use std::sync::Arc;

use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::separator::Separator;
use crate::tree::{Children, ConfigTree, NodeId};

pub use convert::FromConfigValue;
pub use paths::PathAlternatives;

/// Callbacks for [`Config::accept`].
pub trait ConfigVisitor {
    /// Called for each value directly under the scope.
    fn visit_value(&mut self, key: &str, index: usize, value: &str) {
        let _ = (key, index, value);
    }

    /// Called for each nested scope directly under the scope.
    fn visit_scope(&mut self, key: &str, index: usize, scope: Config) {
        let _ = (key, index, scope);
    }
}

/// A view of one scope of a shared configuration tree.
///
/// Cloning a `Config`, or deriving scopes from it, never copies the tree.
/// Every accessor takes one or more paths (see [`PathAlternatives`]) and uses
/// the first that resolves.
///
/// # Examples
///
/// ```
/// use cfgtree::ConfigBuilder;
///
/// # fn main() -> cfgtree::ConfigResult<()> {
/// let config = ConfigBuilder::new().build([
///     r#"{"System": {"Instance": "20", "Enabled": "true", "Tags": ["a", "b"]}}"#,
/// ])?;
///
/// let system = config.scope("System");
/// assert_eq!(system.get::<u32>("Instance")?, Some(20));
/// assert_eq!(system.get::<bool>(["Active", "Enabled"])?, Some(true));
/// assert_eq!(system.get_all::<String>("Tags.")?, ["a", "b"]);
/// assert!(!config.scope("Missing").is_initialized());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Config {
    tree: Arc<RwLock<ConfigTree>>,
    scope: Option<NodeId>,
    separator: Separator,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("scope", &self.scope)
            .field("separator", &self.separator)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Wrap `tree`, scoped at its root.
    #[must_use]
    pub fn new(tree: ConfigTree, separator: Separator) -> Self {
        let root = tree.root();
        Self {
            tree: Arc::new(RwLock::new(tree)),
            scope: Some(root),
            separator,
        }
    }

    /// A view that points at nothing.
    #[must_use]
    pub fn uninitialized(separator: Separator) -> Self {
        Self {
            tree: Arc::new(RwLock::new(ConfigTree::new())),
            scope: None,
            separator,
        }
    }

    fn derive(&self, scope: Option<NodeId>) -> Self {
        Self {
            tree: Arc::clone(&self.tree),
            scope,
            separator: self.separator,
        }
    }

    /// Whether this view points at a node.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.scope.is_some()
    }

    /// The separator used to split paths.
    #[must_use]
    pub const fn separator(&self) -> Separator {
        self.separator
    }

    /// The first value at the first alternative that has one, converted to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Conversion`] when that value does not convert.
    /// Later alternatives are not consulted in that case.
    pub fn get<T: FromConfigValue>(&self, paths: impl PathAlternatives) -> ConfigResult<Option<T>> {
        let Some(scope) = self.scope else {
            return Ok(None);
        };
        let tree = self.tree.read();
        for path in paths.alternatives() {
            if let Some(value) = tree.values(scope, path, self.separator).first() {
                return convert(value, path).map(Some);
            }
        }
        Ok(None)
    }

    /// Like [`Config::get`], falling back to `default` when nothing resolves.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Conversion`] when a found value does not convert.
    pub fn get_or<T: FromConfigValue>(
        &self,
        paths: impl PathAlternatives,
        default: T,
    ) -> ConfigResult<T> {
        Ok(self.get(paths)?.unwrap_or(default))
    }

    /// Every value at the first alternative that has any, converted to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Conversion`] for the first value that does not
    /// convert.
    pub fn get_all<T: FromConfigValue>(
        &self,
        paths: impl PathAlternatives,
    ) -> ConfigResult<Vec<T>> {
        let Some(scope) = self.scope else {
            return Ok(Vec::new());
        };
        let tree = self.tree.read();
        for path in paths.alternatives() {
            let values = tree.values(scope, path, self.separator);
            if !values.is_empty() {
                return values.iter().map(|value| convert(value, path)).collect();
            }
        }
        Ok(Vec::new())
    }

    /// Borrow the raw values at the first alternative that has any.
    ///
    /// The tree stays read-locked while the guard lives; do not call
    /// [`Config::get_mut`] on any view of the same tree until it is dropped.
    #[must_use]
    pub fn get_ref(
        &self,
        paths: impl PathAlternatives,
    ) -> Option<MappedRwLockReadGuard<'_, [String]>> {
        let scope = self.scope?;
        let separator = self.separator;
        RwLockReadGuard::try_map(self.tree.read(), |tree| {
            paths
                .alternatives()
                .into_iter()
                .map(|path| tree.values(scope, path, separator))
                .find(|values| !values.is_empty())
        })
        .ok()
    }

    /// Mutable access to the raw values at the first alternative that has any.
    ///
    /// Changes are visible through every view of the tree, including views
    /// that reach the same node through an alias. The tree stays
    /// write-locked while the guard lives.
    #[must_use]
    pub fn get_mut(
        &self,
        paths: impl PathAlternatives,
    ) -> Option<MappedRwLockWriteGuard<'_, Vec<String>>> {
        let scope = self.scope?;
        let separator = self.separator;
        RwLockWriteGuard::try_map(self.tree.write(), |tree| {
            let path = paths
                .alternatives()
                .into_iter()
                .find(|path| !tree.values(scope, path, separator).is_empty())?;
            tree.values_mut(scope, path, separator)
        })
        .ok()
    }

    /// View of the first node at the first alternative that has one.
    ///
    /// The result is uninitialised when nothing resolves.
    #[must_use]
    pub fn scope(&self, paths: impl PathAlternatives) -> Self {
        self.derive(self.find_nodes(&paths).first().copied())
    }

    /// Views of every node at the first alternative that has any.
    #[must_use]
    pub fn scopes(&self, paths: impl PathAlternatives) -> Vec<Self> {
        self.find_nodes(&paths)
            .into_iter()
            .map(|node| self.derive(Some(node)))
            .collect()
    }

    fn find_nodes(&self, paths: &impl PathAlternatives) -> Vec<NodeId> {
        let Some(scope) = self.scope else {
            return Vec::new();
        };
        let tree = self.tree.read();
        paths
            .alternatives()
            .into_iter()
            .map(|path| tree.nodes(scope, path, self.separator))
            .find(|nodes| !nodes.is_empty())
            .map(<[NodeId]>::to_vec)
            .unwrap_or_default()
    }

    /// Hand every direct child of this scope to `visitor`, in insertion order.
    pub fn accept<V: ConfigVisitor + ?Sized>(&self, visitor: &mut V) {
        let Some(scope) = self.scope else {
            return;
        };
        let entries: Vec<(String, Children)> = self
            .tree
            .read()
            .children(scope)
            .map(|(key, children)| (key.to_owned(), children.clone()))
            .collect();
        for (key, children) in entries {
            match children {
                Children::Values(values) => {
                    for (index, value) in values.iter().enumerate() {
                        visitor.visit_value(&key, index, value);
                    }
                }
                Children::Nodes(nodes) => {
                    for (index, node) in nodes.into_iter().enumerate() {
                        visitor.visit_scope(&key, index, self.derive(Some(node)));
                    }
                }
            }
        }
    }

    /// Render this scope as JSON; uninitialised views render as `null`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        self.scope
            .map_or(Value::Null, |scope| self.tree.read().to_json(scope))
    }
}

fn convert<T: FromConfigValue>(value: &str, path: &str) -> ConfigResult<T> {
    T::from_config_value(value)
        .ok_or_else(|| ConfigError::conversion(value, path, std::any::type_name::<T>()))
}
