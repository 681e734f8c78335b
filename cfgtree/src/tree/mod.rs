//! Arena-backed configuration tree.
//!
//! A [`ConfigTree`] owns every node in a single vector and hands out
//! [`NodeId`] handles. Each node maps string keys to [`Children`]: either a
//! list of nested nodes or a list of leaf strings, never both. Keys keep their
//! insertion order; the merge in [`ConfigTree::overwrite`] walks them in key
//! order instead.
//!
//! Nodes normally have exactly one owner. The node expansion pass is the only
//! place that attaches a node at a second position (see
//! [`ConfigTree::attach_shared`]); such aliases keep the parent they were
//! created under.
//!
//! The arena only grows. Nodes that drop out of the tree, such as the source
//! side of [`ConfigTree::overwrite`], a template body scratch copy or a child
//! list replaced by [`ConfigTree::erase`], stay allocated and unreachable until
//! the tree itself is dropped. [`ConfigTree::node_count`] counts them too. Trees are
//! built once per load, so this costs at most a few copies of the input.

mod merge;
mod path;
mod render;
mod visit;

use indexmap::{IndexMap, map::Entry};

use crate::error::{ChildKind, ConfigError, ConfigResult};

pub use visit::{NodeSite, TreeVisitor, ValueSite, Walk};

/// Handle to a node inside one [`ConfigTree`].
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Children stored under a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Children {
    /// Nested scopes, in declaration order.
    Nodes(Vec<NodeId>),
    /// Leaf strings, in declaration order.
    Values(Vec<String>),
}

impl Children {
    /// Which kind of list this is.
    #[must_use]
    pub const fn kind(&self) -> ChildKind {
        match self {
            Self::Nodes(_) => ChildKind::Nodes,
            Self::Values(_) => ChildKind::Values,
        }
    }

    /// Number of entries in the list.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Nodes(ids) => ids.len(),
            Self::Values(values) => values.len(),
        }
    }

    /// Whether the list has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The node list, or an empty slice for a value list.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        match self {
            Self::Nodes(ids) => ids,
            Self::Values(_) => &[],
        }
    }

    /// The value list, or an empty slice for a node list.
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            Self::Nodes(_) => &[],
            Self::Values(values) => values,
        }
    }
}

/// What replaces one value in [`ConfigTree::values_to_nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// Alias an existing node.
    Shared(NodeId),
    /// A new empty node owned by the converted key.
    Fresh,
}

#[derive(Debug, Clone, Default)]
struct NodeData {
    parent: Option<NodeId>,
    children: IndexMap<String, Children>,
}

/// A hierarchical configuration tree.
///
/// # Examples
///
/// ```
/// use cfgtree::{ConfigTree, Separator};
///
/// # fn main() -> cfgtree::ConfigResult<()> {
/// let mut tree = ConfigTree::new();
/// let root = tree.root();
/// let system = tree.add_node(root, "System")?;
/// tree.set_value(system, "SessionId", "STH")?;
///
/// assert_eq!(tree.values(root, "System.SessionId", Separator::default()), ["STH"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigTree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigTree {
    /// Create a tree holding only an empty root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::default()],
            root: NodeId(0),
        }
    }

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes allocated in the arena, reachable or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[expect(
        clippy::indexing_slicing,
        reason = "node ids are only minted by this arena and nodes are never removed"
    )]
    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    #[expect(
        clippy::indexing_slicing,
        reason = "node ids are only minted by this arena and nodes are never removed"
    )]
    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn push_node(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent,
            children: IndexMap::new(),
        });
        id
    }

    /// Create an empty node that is not attached anywhere yet.
    pub fn create_node(&mut self) -> NodeId {
        self.push_node(None)
    }

    /// Parent of `id`, or `None` for the root and detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    /// Whether `id` has no children at all.
    #[must_use]
    pub fn is_empty(&self, id: NodeId) -> bool {
        self.data(id).children.is_empty()
    }

    /// Children of `id` in insertion order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (&str, &Children)> {
        self.data(id)
            .children
            .iter()
            .map(|(key, children)| (key.as_str(), children))
    }

    /// Children stored directly under `key`.
    #[must_use]
    pub fn child(&self, id: NodeId, key: &str) -> Option<&Children> {
        self.data(id).children.get(key)
    }

    /// Value `index` stored directly under `key`.
    #[must_use]
    pub fn value(&self, id: NodeId, key: &str, index: usize) -> Option<&str> {
        self.child(id, key)
            .and_then(|children| children.values().get(index))
            .map(String::as_str)
    }

    /// Mutable access to value `index` stored directly under `key`.
    pub fn value_mut(&mut self, id: NodeId, key: &str, index: usize) -> Option<&mut String> {
        match self.data_mut(id).children.get_mut(key) {
            Some(Children::Values(values)) => values.get_mut(index),
            _ => None,
        }
    }

    /// Append `value` to the value list under `key`, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KindMismatch`] when `key` already holds nodes.
    pub fn set_value(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> ConfigResult<()> {
        match self.data_mut(id).children.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(Children::Values(vec![value.into()]));
                Ok(())
            }
            Entry::Occupied(mut slot) => {
                if let Children::Values(values) = slot.get_mut() {
                    values.push(value.into());
                    return Ok(());
                }
                Err(ConfigError::kind_mismatch(
                    slot.key().clone(),
                    ChildKind::Nodes,
                    ChildKind::Values,
                ))
            }
        }
    }

    fn push_node_entry(&mut self, id: NodeId, key: String, child: NodeId) -> ConfigResult<()> {
        match self.data_mut(id).children.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(Children::Nodes(vec![child]));
                Ok(())
            }
            Entry::Occupied(mut slot) => {
                if let Children::Nodes(ids) = slot.get_mut() {
                    ids.push(child);
                    return Ok(());
                }
                Err(ConfigError::kind_mismatch(
                    slot.key().clone(),
                    ChildKind::Values,
                    ChildKind::Nodes,
                ))
            }
        }
    }

    /// Append `child` to the node list under `key` and make `id` its parent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KindMismatch`] when `key` already holds values.
    pub fn set_node(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        child: NodeId,
    ) -> ConfigResult<()> {
        self.push_node_entry(id, key.into(), child)?;
        self.data_mut(child).parent = Some(id);
        Ok(())
    }

    /// Create an empty child under `key` and return it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KindMismatch`] when `key` already holds values.
    pub fn add_node(&mut self, id: NodeId, key: impl Into<String>) -> ConfigResult<NodeId> {
        let child = self.create_node();
        self.set_node(id, key, child)?;
        Ok(child)
    }

    /// Make `target` reachable under `key` as well as from its current place.
    ///
    /// The node is not copied and keeps its original parent, so a change made
    /// through either position is visible through both.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KindMismatch`] when `key` already holds values.
    pub fn attach_shared(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        target: NodeId,
    ) -> ConfigResult<()> {
        self.push_node_entry(id, key.into(), target)
    }

    /// Attach an independent deep copy of `source` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KindMismatch`] when `key` already holds values.
    pub fn attach_clone(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        source: NodeId,
    ) -> ConfigResult<NodeId> {
        let copy = self.clone_subtree(source);
        self.set_node(id, key, copy)?;
        Ok(copy)
    }

    /// Remove everything stored under `key`.
    pub fn erase(&mut self, id: NodeId, key: &str) -> Option<Children> {
        self.data_mut(id).children.shift_remove(key)
    }

    /// Remove value `index` under `key`; the key goes away with its last value.
    pub fn erase_value(&mut self, id: NodeId, key: &str, index: usize) -> Option<String> {
        let children = &mut self.data_mut(id).children;
        let Some(Children::Values(values)) = children.get_mut(key) else {
            return None;
        };
        if index >= values.len() {
            return None;
        }
        let removed = values.remove(index);
        if values.is_empty() {
            children.shift_remove(key);
        }
        Some(removed)
    }

    /// Replace whatever `key` holds with `children`, keeping its position.
    ///
    /// Nested nodes in `children` are re-parented to `id`.
    pub fn replace(&mut self, id: NodeId, key: impl Into<String>, children: Children) {
        if let Children::Nodes(ids) = &children {
            for child in ids.clone() {
                self.data_mut(child).parent = Some(id);
            }
        }
        self.data_mut(id).children.insert(key.into(), children);
    }

    /// Turn the value list under `key` into a node list, one attachment per
    /// value, keeping the key's position.
    ///
    /// Values are consumed from the highest index down. Shared attachments
    /// keep their original parent; fresh ones are owned by `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KindMismatch`] when `key` holds nodes.
    pub fn values_to_nodes(
        &mut self,
        id: NodeId,
        key: &str,
        attachments: &[Attachment],
    ) -> ConfigResult<()> {
        let mut values = match self.data_mut(id).children.get_mut(key) {
            Some(Children::Values(values)) => std::mem::take(values),
            Some(Children::Nodes(_)) => {
                return Err(ConfigError::kind_mismatch(
                    key,
                    ChildKind::Nodes,
                    ChildKind::Values,
                ));
            }
            None => return Ok(()),
        };
        let mut nodes = Vec::with_capacity(values.len());
        while values.pop().is_some() {
            let node = match attachments.get(values.len()) {
                Some(Attachment::Shared(target)) => *target,
                Some(Attachment::Fresh) | None => self.push_node(Some(id)),
            };
            nodes.push(node);
        }
        nodes.reverse();
        if let Some(slot) = self.data_mut(id).children.get_mut(key) {
            *slot = Children::Nodes(nodes);
        }
        Ok(())
    }

    fn reparent_children(&mut self, id: NodeId) {
        let owned: Vec<NodeId> = self
            .data(id)
            .children
            .values()
            .flat_map(|children| children.nodes().iter().copied())
            .collect();
        for child in owned {
            self.data_mut(child).parent = Some(id);
        }
    }
}

#[cfg(test)]
mod tests;
