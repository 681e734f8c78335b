//! Separator-delimited path navigation.

use super::{Children, ConfigTree, NodeId};
use crate::separator::Separator;

/// A path made of exactly one separator addresses the anonymous children.
fn clear_lone_separator(path: &str, separator: Separator) -> &str {
    let mut chars = path.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c == separator.as_char() => "",
        _ => path,
    }
}

impl ConfigTree {
    /// Walk `path` from `from` and return the node holding its final segment,
    /// together with that segment.
    ///
    /// Intermediate segments always follow the first node stored under the
    /// segment's key. Returns `None` when an intermediate segment is missing
    /// or holds values.
    #[must_use]
    pub fn locate<'p>(
        &self,
        from: NodeId,
        path: &'p str,
        separator: Separator,
    ) -> Option<(NodeId, &'p str)> {
        let mut current = from;
        let mut rest = clear_lone_separator(path, separator);
        while let Some((head, tail)) = rest.split_once(separator.as_char()) {
            current = *self.child(current, head)?.nodes().first()?;
            rest = clear_lone_separator(tail, separator);
        }
        Some((current, rest))
    }

    /// All values stored at `path`, or an empty slice when absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::{ConfigTree, Separator};
    ///
    /// # fn main() -> cfgtree::ConfigResult<()> {
    /// let mut tree = ConfigTree::new();
    /// let root = tree.root();
    /// let array = tree.add_node(root, "Array")?;
    /// for item in ["Elem1", "Elem2"] {
    ///     tree.set_value(array, "", item)?;
    /// }
    ///
    /// let sep = Separator::default();
    /// assert_eq!(tree.values(root, "Array.", sep), ["Elem1", "Elem2"]);
    /// assert_eq!(tree.values(array, ".", sep), ["Elem1", "Elem2"]);
    /// assert!(tree.values(root, "Missing.Key", sep).is_empty());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn values(&self, from: NodeId, path: &str, separator: Separator) -> &[String] {
        self.locate(from, path, separator)
            .and_then(|(node, key)| self.child(node, key))
            .map(Children::values)
            .unwrap_or_default()
    }

    /// All nodes stored at `path`, or an empty slice when absent.
    #[must_use]
    pub fn nodes(&self, from: NodeId, path: &str, separator: Separator) -> &[NodeId] {
        self.locate(from, path, separator)
            .and_then(|(node, key)| self.child(node, key))
            .map(Children::nodes)
            .unwrap_or_default()
    }

    /// Mutable access to the value list at `path`.
    pub fn values_mut(
        &mut self,
        from: NodeId,
        path: &str,
        separator: Separator,
    ) -> Option<&mut Vec<String>> {
        let (node, key) = self.locate(from, path, separator)?;
        match self.data_mut(node).children.get_mut(key) {
            Some(Children::Values(values)) => Some(values),
            _ => None,
        }
    }
}
