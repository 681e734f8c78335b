//! Regex matching for `%prefix<levels>PATH%` macros.

use regex::{Captures, Regex};

use crate::error::{ConfigError, ConfigResult};
use crate::separator::{LevelMarker, Separator};
use crate::tree::{ConfigTree, NodeId, TreeVisitor, ValueSite};

/// Compiled matcher for one macro family.
///
/// # Examples
///
/// ```
/// use cfgtree::{LevelMarker, MacroPattern, Separator};
///
/// # fn main() -> cfgtree::ConfigResult<()> {
/// let pattern = MacroPattern::new("param", Separator::default(), LevelMarker::Separator)?;
/// let found = pattern.find_all("100.200.100.%param..Parameters.LinkId%");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].path, "Parameters.LinkId");
/// assert_eq!(found[0].levels, 1);
/// assert!(found[0].relative);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MacroPattern {
    prefix: String,
    level_unit: String,
    embedded: Regex,
    whole: Regex,
}

/// One macro occurrence found by a [`MacroPattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroRef<'t> {
    /// Full macro text including the `%` delimiters.
    pub text: &'t str,
    /// Byte offset of the opening `%`.
    pub start: usize,
    /// Byte offset just past the closing `%`.
    pub end: usize,
    /// Whether the macro carries level markers.
    pub relative: bool,
    /// Number of parent links to walk before applying `path`.
    pub levels: usize,
    /// Separator-joined key path.
    pub path: &'t str,
}

impl MacroRef<'_> {
    /// Node from which `path` is resolved for a macro found under `from`.
    ///
    /// Plain macros resolve from the root; relative ones walk `levels`
    /// parents up from `from`. Returns `None` when the walk leaves the tree.
    #[must_use]
    pub fn scope(&self, tree: &ConfigTree, from: NodeId) -> Option<NodeId> {
        if !self.relative {
            return Some(tree.root());
        }
        walk_up(tree, from, self.levels)
    }
}

pub(crate) fn walk_up(tree: &ConfigTree, from: NodeId, levels: usize) -> Option<NodeId> {
    let mut scope = from;
    for _ in 0..levels {
        scope = tree.parent(scope)?;
    }
    Some(scope)
}

const BLANK: &str = r"[ \t\r\n]*";

impl MacroPattern {
    /// Build the matcher for `%prefix...%` macros.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the regex fails to compile.
    pub fn new(prefix: &str, separator: Separator, marker: LevelMarker) -> ConfigResult<Self> {
        let name = regex::escape(prefix);
        let sep = regex::escape(&separator.to_string());
        let (core, level_unit) = match marker {
            LevelMarker::Separator => (
                format!("%{name}{sep}(?P<up>(?:{sep})*)(?P<path>[^%]+)%"),
                separator.to_string(),
            ),
            LevelMarker::Custom(c) => {
                let level = regex::escape(&c.to_string());
                let current = format!("(?P<current>(?:{level}{sep})*)");
                let up = format!("(?P<up>(?:{level}{level}{sep})*)");
                (
                    format!("%{name}(?:{sep}|{current}{up})(?P<path>[^%]+)%"),
                    format!("{c}{c}{separator}"),
                )
            }
        };
        let compile = |source: &str| {
            Regex::new(source).map_err(|err| ConfigError::invalid_pattern(source, err))
        };
        Ok(Self {
            prefix: prefix.to_owned(),
            level_unit,
            embedded: compile(&format!("(?P<macro>{core})"))?,
            whole: compile(&format!("^{BLANK}(?P<macro>{core}){BLANK}$"))?,
        })
    }

    /// The macro family name, e.g. `param`.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `text` contains at least one macro.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.embedded.is_match(text)
    }

    /// Every macro embedded in `text`, left to right.
    #[must_use]
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<MacroRef<'t>> {
        self.embedded
            .captures_iter(text)
            .filter_map(|caps| self.to_ref(&caps))
            .collect()
    }

    /// The macro that makes up all of `text`, ignoring surrounding blanks.
    #[must_use]
    pub fn match_whole<'t>(&self, text: &'t str) -> Option<MacroRef<'t>> {
        let caps = self.whole.captures(text)?;
        self.to_ref(&caps)
    }

    fn to_ref<'t>(&self, caps: &Captures<'t>) -> Option<MacroRef<'t>> {
        let text = caps.name("macro")?;
        let current = caps.name("current").map_or("", |m| m.as_str());
        let up = caps.name("up").map_or("", |m| m.as_str());
        Some(MacroRef {
            text: text.as_str(),
            start: text.start(),
            end: text.end(),
            relative: !current.is_empty() || !up.is_empty(),
            levels: up.matches(self.level_unit.as_str()).count(),
            path: caps.name("path")?.as_str(),
        })
    }
}

/// A value position found while scanning the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Site {
    pub(crate) node: NodeId,
    pub(crate) key: String,
    pub(crate) index: usize,
}

impl Site {
    pub(crate) fn new(node: NodeId, key: impl Into<String>, index: usize) -> Self {
        Self {
            node,
            key: key.into(),
            index,
        }
    }
}

/// Collects the values that contain (or entirely are) a macro.
pub(crate) struct ValueScan<'p> {
    pattern: &'p MacroPattern,
    whole: bool,
    pub(crate) sites: Vec<Site>,
}

impl<'p> ValueScan<'p> {
    pub(crate) fn run(tree: &mut ConfigTree, pattern: &'p MacroPattern, whole: bool) -> Vec<Site> {
        let mut scan = Self {
            pattern,
            whole,
            sites: Vec::new(),
        };
        tree.accept(tree.root(), &mut scan);
        scan.sites
    }
}

impl TreeVisitor for ValueScan<'_> {
    fn visit_value(&mut self, site: ValueSite<'_>, value: &mut String) {
        let hit = if self.whole {
            self.pattern.match_whole(value).is_some()
        } else {
            self.pattern.is_match(value)
        };
        if hit {
            self.sites.push(Site::new(site.parent, site.key, site.index));
        }
    }
}
