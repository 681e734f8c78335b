//! Ordered merge, deep copy and child exchange.

use std::collections::HashMap;

use tracing::trace;

use super::{Children, ConfigTree, NodeId};

impl ConfigTree {
    /// Merge `other` into this tree; `other` wins.
    ///
    /// Keys are joined in sorted order. For a key present on both sides a
    /// value list is replaced as a whole, a node list is merged element by
    /// element and any extra incoming nodes are appended, and a kind
    /// conflict is settled in favour of the incoming children. Keys only
    /// present in `other` are added after the existing ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::{ConfigTree, Separator};
    ///
    /// # fn main() -> cfgtree::ConfigResult<()> {
    /// let mut base = ConfigTree::new();
    /// let root = base.root();
    /// base.set_value(root, "Status", "Disabled")?;
    /// base.set_value(root, "Name", "base")?;
    ///
    /// let mut update = ConfigTree::new();
    /// let update_root = update.root();
    /// update.set_value(update_root, "Status", "Enabled")?;
    ///
    /// base.overwrite(update);
    /// let sep = Separator::default();
    /// assert_eq!(base.values(root, "Status", sep), ["Enabled"]);
    /// assert_eq!(base.values(root, "Name", sep), ["base"]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn overwrite(&mut self, other: Self) {
        let incoming = self.import(other);
        self.overwrite_node(self.root, incoming);
    }

    /// Move every node of `other` into this arena and return the id its root
    /// now has. The imported root is detached; sharing inside `other` is kept.
    pub fn import(&mut self, other: Self) -> NodeId {
        let offset = self.nodes.len();
        let shift = |id: NodeId| NodeId(id.0 + offset);
        for mut data in other.nodes {
            data.parent = data.parent.map(shift);
            for children in data.children.values_mut() {
                if let Children::Nodes(ids) = children {
                    for id in ids.iter_mut() {
                        *id = shift(*id);
                    }
                }
            }
            self.nodes.push(data);
        }
        shift(other.root)
    }

    /// Merge the children of `from` into `into`, leaving `from` empty.
    ///
    /// Both nodes must belong to this tree. See [`ConfigTree::overwrite`]
    /// for the rules.
    pub fn overwrite_node(&mut self, into: NodeId, from: NodeId) {
        if into == from {
            return;
        }
        let incoming = std::mem::take(&mut self.data_mut(from).children);
        if self.is_empty(into) {
            self.data_mut(into).children = incoming;
            self.reparent_children(into);
            return;
        }

        let mut existing_keys: Vec<String> = self.data(into).children.keys().cloned().collect();
        existing_keys.sort_unstable();
        let mut sorted: Vec<(String, Children)> = incoming.into_iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let mut existing = existing_keys.iter().peekable();
        for (key, children) in sorted {
            while existing.next_if(|current| **current < key).is_some() {}
            if existing.next_if(|current| **current == key).is_some() {
                self.merge_entry(into, key, children);
            } else {
                trace!(key = %key, "adding key during merge");
                self.replace(into, key, children);
            }
        }
    }

    fn merge_entry(&mut self, into: NodeId, key: String, incoming: Children) {
        let current = match self.child(into, &key) {
            Some(Children::Nodes(ids)) => Some(ids.clone()),
            _ => None,
        };
        match (current, incoming) {
            (Some(targets), Children::Nodes(sources)) => {
                for (target, source) in targets.iter().zip(&sources) {
                    self.overwrite_node(*target, *source);
                }
                let extra = sources.get(targets.len()..).unwrap_or_default().to_vec();
                for id in &extra {
                    self.data_mut(*id).parent = Some(into);
                }
                if let Some(Children::Nodes(ids)) = self.data_mut(into).children.get_mut(&key) {
                    ids.extend(extra);
                }
            }
            (_, replacement) => {
                trace!(key = %key, "replacing key during merge");
                self.replace(into, key, replacement);
            }
        }
    }

    /// Deep-copy the subtree under `source` into new, detached nodes.
    ///
    /// The copy shares nothing with the original. A node reachable twice
    /// inside `source` is copied once and reachable twice inside the copy.
    pub fn clone_subtree(&mut self, source: NodeId) -> NodeId {
        let mut copies = HashMap::new();
        self.clone_node(source, None, &mut copies)
    }

    fn clone_node(
        &mut self,
        source: NodeId,
        parent: Option<NodeId>,
        copies: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        if let Some(copy) = copies.get(&source) {
            return *copy;
        }
        let copy = self.push_node(parent);
        copies.insert(source, copy);
        let entries: Vec<(String, Children)> = self
            .data(source)
            .children
            .iter()
            .map(|(key, children)| (key.clone(), children.clone()))
            .collect();
        for (key, children) in entries {
            let cloned = match children {
                Children::Values(values) => Children::Values(values),
                Children::Nodes(ids) => Children::Nodes(
                    ids.into_iter()
                        .map(|id| self.clone_node(id, Some(copy), copies))
                        .collect(),
                ),
            };
            self.data_mut(copy).children.insert(key, cloned);
        }
        copy
    }

    /// Exchange the children of `a` and `b`.
    ///
    /// Only the immediate children get a new parent; deeper nodes are
    /// untouched because their owners did not change.
    pub fn swap_children(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let first = std::mem::take(&mut self.data_mut(a).children);
        let second = std::mem::replace(&mut self.data_mut(b).children, first);
        self.data_mut(a).children = second;
        self.reparent_children(a);
        self.reparent_children(b);
    }
}
