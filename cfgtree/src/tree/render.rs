//! JSON and text rendering.

use std::fmt;

use serde_json::{Map, Value};

use super::{Children, ConfigTree, NodeId};

impl ConfigTree {
    /// Render the subtree under `id` as JSON.
    ///
    /// A key with one entry becomes a plain member; a key with several becomes
    /// an array. An alias that leads back to one of its own ancestors renders
    /// as `null`.
    #[must_use]
    pub fn to_json(&self, id: NodeId) -> Value {
        let mut ancestors = Vec::new();
        self.node_to_json(id, &mut ancestors)
    }

    fn node_to_json(&self, id: NodeId, ancestors: &mut Vec<NodeId>) -> Value {
        if ancestors.contains(&id) {
            return Value::Null;
        }
        ancestors.push(id);
        let mut object = Map::new();
        for (key, children) in self.children(id) {
            let mut items: Vec<Value> = match children {
                Children::Values(values) => values.iter().cloned().map(Value::String).collect(),
                Children::Nodes(ids) => ids
                    .iter()
                    .map(|child| self.node_to_json(*child, ancestors))
                    .collect(),
            };
            let member = if items.len() == 1 {
                items.pop().unwrap_or(Value::Null)
            } else {
                Value::Array(items)
            };
            object.insert(key.to_owned(), member);
        }
        ancestors.pop();
        Value::Object(object)
    }

    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: NodeId,
        depth: usize,
        ancestors: &mut Vec<NodeId>,
    ) -> fmt::Result {
        ancestors.push(id);
        let indent = depth * 2;
        for (key, children) in self.children(id) {
            match children {
                Children::Values(values) => {
                    for value in values {
                        writeln!(f, "{:indent$}{key} = {value}", "")?;
                    }
                }
                Children::Nodes(ids) => {
                    for child in ids {
                        if ancestors.contains(child) {
                            writeln!(f, "{:indent$}{key} -> (cycle)", "")?;
                        } else {
                            writeln!(f, "{:indent$}{key}", "")?;
                            self.write_node(f, *child, depth + 1, ancestors)?;
                        }
                    }
                }
            }
        }
        ancestors.pop();
        Ok(())
    }
}

impl fmt::Display for ConfigTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root, 0, &mut Vec::new())
    }
}
