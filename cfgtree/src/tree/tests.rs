//! Unit tests for the arena tree, its navigation and its merge.

#![expect(
    clippy::panic_in_result_fn,
    reason = "assertions read better than ensure! for value comparisons"
)]

use anyhow::{Result, ensure};
use rstest::{fixture, rstest};
use serde_json::json;

use super::{Children, ConfigTree, NodeId, TreeVisitor, ValueSite, Walk};
use crate::error::{ChildKind, ConfigError};
use crate::separator::Separator;

fn sep() -> Separator {
    Separator::default()
}

/// `A` holds two `B` nodes with different contents.
#[fixture]
fn duplicated() -> Result<ConfigTree> {
    let mut tree = ConfigTree::new();
    let root = tree.root();
    let a = tree.add_node(root, "A")?;
    let first = tree.add_node(a, "B")?;
    tree.set_value(first, "C", "first")?;
    let second = tree.add_node(a, "B")?;
    tree.set_value(second, "C", "second")?;
    Ok(tree)
}

#[rstest]
fn intermediate_segments_follow_first_duplicate(duplicated: Result<ConfigTree>) -> Result<()> {
    let tree = duplicated?;
    let root = tree.root();
    assert_eq!(tree.values(root, "A.B.C", sep()), ["first"]);
    assert_eq!(tree.nodes(root, "A.B", sep()).len(), 2);
    Ok(())
}

#[rstest]
#[case("Missing")]
#[case("A.Missing.C")]
#[case("A.B.C.D")]
fn absent_paths_are_empty(duplicated: Result<ConfigTree>, #[case] path: &str) -> Result<()> {
    let tree = duplicated?;
    assert!(tree.values(tree.root(), path, sep()).is_empty());
    assert!(tree.nodes(tree.root(), path, sep()).is_empty());
    Ok(())
}

#[test]
fn lone_separator_selects_anonymous_children() -> Result<()> {
    let mut tree = ConfigTree::new();
    let root = tree.root();
    let array = tree.add_node(root, "Array")?;
    for item in ["Elem1", "Elem2", "Elem3"] {
        tree.set_value(array, "", item)?;
    }
    assert_eq!(tree.values(array, ".", sep()), ["Elem1", "Elem2", "Elem3"]);
    assert_eq!(tree.values(root, "Array.", sep()), ["Elem1", "Elem2", "Elem3"]);
    assert_eq!(tree.values(root, "Array/", Separator::new('/')), ["Elem1", "Elem2", "Elem3"]);
    Ok(())
}

#[test]
fn mixing_kinds_under_one_key_fails() -> Result<()> {
    let mut tree = ConfigTree::new();
    let root = tree.root();
    tree.set_value(root, "Key", "value")?;
    let err = tree.add_node(root, "Key").err();
    ensure!(
        matches!(
            err,
            Some(ConfigError::KindMismatch {
                existing: ChildKind::Values,
                requested: ChildKind::Nodes,
                ..
            })
        ),
        "unexpected outcome: {err:?}"
    );
    Ok(())
}

#[test]
fn erase_value_drops_emptied_key() -> Result<()> {
    let mut tree = ConfigTree::new();
    let root = tree.root();
    tree.set_value(root, "Key", "one")?;
    tree.set_value(root, "Key", "two")?;
    assert_eq!(tree.erase_value(root, "Key", 0).as_deref(), Some("one"));
    assert_eq!(tree.erase_value(root, "Key", 3), None);
    assert_eq!(tree.erase_value(root, "Key", 0).as_deref(), Some("two"));
    assert!(tree.child(root, "Key").is_none());
    Ok(())
}

fn tree_from(value: &serde_json::Value) -> Result<ConfigTree> {
    fn fill(tree: &mut ConfigTree, node: NodeId, value: &serde_json::Value) -> Result<()> {
        let Some(object) = value.as_object() else {
            return Ok(());
        };
        for (key, member) in object {
            let items = member.as_array().cloned().unwrap_or_else(|| vec![member.clone()]);
            for item in &items {
                if let Some(text) = item.as_str() {
                    tree.set_value(node, key.as_str(), text)?;
                } else {
                    let child = tree.add_node(node, key.as_str())?;
                    fill(tree, child, item)?;
                }
            }
        }
        Ok(())
    }
    let mut tree = ConfigTree::new();
    let root = tree.root();
    fill(&mut tree, root, value)?;
    Ok(tree)
}

#[rstest]
#[case::disjoint(
    json!({"A": "1", "N": {"X": "x"}}),
    json!({"B": "2", "M": {"Y": "y"}}),
    json!({"A": "1", "N": {"X": "x"}, "B": "2", "M": {"Y": "y"}})
)]
#[case::values_replace_whole_list(
    json!({"List": ["a", "b", "c"], "Keep": "k"}),
    json!({"List": ["z"]}),
    json!({"List": "z", "Keep": "k"})
)]
#[case::nested_merge(
    json!({"S": {"Status": "Disabled", "Id": "STH"}}),
    json!({"S": {"Status": "Enabled", "Extra": "e"}}),
    json!({"S": {"Status": "Enabled", "Id": "STH", "Extra": "e"}})
)]
#[case::node_lists_merge_pairwise_and_append(
    json!({"R": [{"A": "1"}, {"A": "2"}]}),
    json!({"R": [{"B": "x"}, {"A": "y"}, {"A": "3"}]}),
    json!({"R": [{"A": "1", "B": "x"}, {"A": "y"}, {"A": "3"}]})
)]
#[case::incoming_kind_wins(
    json!({"K": "value", "L": {"X": "x"}}),
    json!({"K": {"Now": "node"}, "L": "flat"}),
    json!({"K": {"Now": "node"}, "L": "flat"})
)]
fn overwrite_follows_merge_rules(
    #[case] base: serde_json::Value,
    #[case] update: serde_json::Value,
    #[case] expected: serde_json::Value,
) -> Result<()> {
    let mut tree = tree_from(&base)?;
    tree.overwrite(tree_from(&update)?);
    assert_eq!(tree.to_json(tree.root()), expected);
    Ok(())
}

#[test]
fn overwrite_into_empty_tree_takes_everything() -> Result<()> {
    let mut tree = ConfigTree::new();
    tree.overwrite(tree_from(&json!({"A": {"B": "c"}}))?);
    let root = tree.root();
    let a = tree.nodes(root, "A", sep()).first().copied();
    ensure!(a.is_some(), "A missing after merge");
    assert_eq!(a.and_then(|id| tree.parent(id)), Some(root));
    Ok(())
}

#[test]
fn merged_away_nodes_stay_in_the_arena() -> Result<()> {
    let mut tree = tree_from(&json!({"A": {"X": "1"}}))?;
    let update = tree_from(&json!({"A": {"Y": "2"}}))?;
    let before = tree.node_count() + update.node_count();
    tree.overwrite(update);
    assert_eq!(tree.node_count(), before);
    assert_eq!(tree.to_json(tree.root()), json!({"A": {"X": "1", "Y": "2"}}));
    Ok(())
}

fn assert_parents_consistent(tree: &ConfigTree, node: NodeId) {
    for (key, children) in tree.children(node) {
        for child in children.nodes() {
            assert_eq!(tree.parent(*child), Some(node), "bad parent under '{key}'");
            assert_parents_consistent(tree, *child);
        }
    }
}

#[test]
fn overwrite_keeps_parent_links_consistent() -> Result<()> {
    let mut tree = tree_from(&json!({"R": [{"A": {"X": "1"}}], "S": {"T": "t"}}))?;
    tree.overwrite(tree_from(&json!({
        "R": [{"A": {"Y": "2"}}, {"B": {"Z": "3"}}],
        "New": {"Deep": {"Er": "e"}}
    }))?);
    assert_parents_consistent(&tree, tree.root());
    Ok(())
}

#[test]
fn clones_are_independent() -> Result<()> {
    let mut tree = tree_from(&json!({"T": {"S": {"Name": "template"}}}))?;
    let root = tree.root();
    let Some(template) = tree.nodes(root, "T", sep()).first().copied() else {
        anyhow::bail!("template node missing");
    };
    let holder = tree.add_node(root, "Copies")?;
    let copy = tree.attach_clone(holder, "", template)?;

    if let Some(name) = tree.values_mut(copy, "S.Name", sep()).and_then(|v| v.first_mut()) {
        *name = "changed".to_owned();
    }
    assert_eq!(tree.values(root, "T.S.Name", sep()), ["template"]);
    assert_eq!(tree.values(root, "Copies..S.Name", sep()), ["changed"]);
    assert_eq!(tree.parent(copy), Some(holder));
    assert_parents_consistent(&tree, root);
    Ok(())
}

#[test]
fn shared_attachments_alias_the_same_node() -> Result<()> {
    let mut tree = tree_from(&json!({"System": {"Id": "STH"}}))?;
    let root = tree.root();
    let Some(system) = tree.nodes(root, "System", sep()).first().copied() else {
        anyhow::bail!("system node missing");
    };
    tree.attach_shared(root, "Alias", system)?;

    if let Some(id) = tree.values_mut(root, "Alias.Id", sep()).and_then(|v| v.first_mut()) {
        *id = "NEW".to_owned();
    }
    assert_eq!(tree.values(root, "System.Id", sep()), ["NEW"]);
    assert_eq!(tree.parent(system), Some(root));
    Ok(())
}

#[test]
fn clone_of_self_referencing_alias_terminates() -> Result<()> {
    let mut tree = tree_from(&json!({"Loop": {"Name": "x"}}))?;
    let root = tree.root();
    let Some(node) = tree.nodes(root, "Loop", sep()).first().copied() else {
        anyhow::bail!("loop node missing");
    };
    tree.attach_shared(node, "Again", node)?;
    let copy = tree.clone_subtree(node);
    assert_eq!(tree.nodes(copy, "Again", sep()), [copy]);
    assert_eq!(tree.to_json(node), json!({"Name": "x", "Again": null}));
    Ok(())
}

#[test]
fn swap_refreshes_immediate_parents() -> Result<()> {
    let mut tree = tree_from(&json!({"A": {"Inner": {"V": "a"}}, "B": {"Other": {"V": "b"}}}))?;
    let root = tree.root();
    let a = tree.nodes(root, "A", sep()).first().copied();
    let b = tree.nodes(root, "B", sep()).first().copied();
    let (Some(a), Some(b)) = (a, b) else {
        anyhow::bail!("fixture nodes missing");
    };
    tree.swap_children(a, b);
    assert_eq!(tree.values(root, "A.Other.V", sep()), ["b"]);
    assert_eq!(tree.values(root, "B.Inner.V", sep()), ["a"]);
    assert_parents_consistent(&tree, root);
    Ok(())
}

#[derive(Default)]
struct Upper {
    visited: Vec<String>,
}

impl TreeVisitor for Upper {
    fn visit_value(&mut self, site: ValueSite<'_>, value: &mut String) {
        self.visited.push(format!("{}[{}]", site.key, site.index));
        *value = value.to_uppercase();
    }

    fn visit_node(&mut self, site: super::NodeSite<'_>) -> Walk {
        if site.key == "Skip" { Walk::Skip } else { Walk::Descend }
    }
}

#[test]
fn visitor_rewrites_values_in_insertion_order() -> Result<()> {
    let mut tree = tree_from(&json!({
        "Z": "z",
        "N": {"L": ["a", "b"]},
        "Skip": {"Hidden": "h"},
        "A": "a"
    }))?;
    let root = tree.root();
    let mut visitor = Upper::default();
    tree.accept(root, &mut visitor);
    assert_eq!(visitor.visited, ["Z[0]", "L[0]", "L[1]", "A[0]"]);
    assert_eq!(tree.values(root, "N.L", sep()), ["A", "B"]);
    assert_eq!(tree.values(root, "Skip.Hidden", sep()), ["h"]);
    Ok(())
}

#[test]
fn replace_keeps_key_position() -> Result<()> {
    let mut tree = tree_from(&json!({"First": "1", "Second": "2", "Third": "3"}))?;
    let root = tree.root();
    let node = tree.create_node();
    tree.replace(root, "Second", Children::Nodes(vec![node]));
    let keys: Vec<&str> = tree.children(root).map(|(key, _)| key).collect();
    assert_eq!(keys, ["First", "Second", "Third"]);
    assert_eq!(tree.parent(node), Some(root));
    Ok(())
}

#[test]
fn display_lists_nested_values() -> Result<()> {
    let tree = tree_from(&json!({"S": {"Id": "STH"}, "K": "v"}))?;
    assert_eq!(tree.to_string(), "S\n  Id = STH\nK = v\n");
    Ok(())
}
