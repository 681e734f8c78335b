//! Depth-first traversal in insertion order.

use std::collections::HashSet;

use super::{Children, ConfigTree, NodeId};

/// Whether [`ConfigTree::accept`] should enter a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Visit the node's children next.
    Descend,
    /// Leave the node's children alone.
    Skip,
}

/// Position of a leaf value handed to [`TreeVisitor::visit_value`].
#[derive(Debug, Clone, Copy)]
pub struct ValueSite<'a> {
    /// Node holding the value.
    pub parent: NodeId,
    /// Key the value is stored under.
    pub key: &'a str,
    /// Position within the key's value list.
    pub index: usize,
}

/// Position of a nested node handed to [`TreeVisitor::visit_node`].
#[derive(Debug, Clone, Copy)]
pub struct NodeSite<'a> {
    /// Node holding the child.
    pub parent: NodeId,
    /// Key the child is stored under.
    pub key: &'a str,
    /// Position within the key's node list.
    pub index: usize,
    /// The child itself.
    pub node: NodeId,
}

/// Callbacks for [`ConfigTree::accept`].
pub trait TreeVisitor {
    /// Called for every leaf value; the value may be rewritten in place.
    fn visit_value(&mut self, site: ValueSite<'_>, value: &mut String) {
        let _ = (site, value);
    }

    /// Called for every nested node before its children.
    fn visit_node(&mut self, site: NodeSite<'_>) -> Walk {
        let _ = site;
        Walk::Descend
    }
}

impl ConfigTree {
    /// Walk the subtree under `from` depth first, in insertion order.
    ///
    /// A node reachable through several aliases is entered only once.
    pub fn accept<V>(&mut self, from: NodeId, visitor: &mut V)
    where
        V: TreeVisitor + ?Sized,
    {
        let mut entered = HashSet::from([from]);
        self.walk(from, visitor, &mut entered);
    }

    fn walk<V>(&mut self, id: NodeId, visitor: &mut V, entered: &mut HashSet<NodeId>)
    where
        V: TreeVisitor + ?Sized,
    {
        for position in 0..self.data(id).children.len() {
            let Some((key, children)) = self.data_mut(id).children.get_index_mut(position) else {
                continue;
            };
            let descend: Vec<NodeId> = match children {
                Children::Values(values) => {
                    for (index, value) in values.iter_mut().enumerate() {
                        let site = ValueSite {
                            parent: id,
                            key: key.as_str(),
                            index,
                        };
                        visitor.visit_value(site, value);
                    }
                    Vec::new()
                }
                Children::Nodes(ids) => ids
                    .iter()
                    .enumerate()
                    .filter(|(index, node)| {
                        let site = NodeSite {
                            parent: id,
                            key: key.as_str(),
                            index: *index,
                            node: **node,
                        };
                        visitor.visit_node(site) == Walk::Descend
                    })
                    .map(|(_, node)| *node)
                    .collect(),
            };
            for node in descend {
                if entered.insert(node) {
                    self.walk(node, visitor, entered);
                }
            }
        }
    }
}
