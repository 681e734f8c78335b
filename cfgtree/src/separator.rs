//! Single-character settings shared by the tree, the builder and the macro passes.

use std::fmt;

/// Character that splits a path string into key segments.
///
/// # Examples
///
/// ```
/// use cfgtree::Separator;
///
/// assert_eq!(Separator::default().as_char(), '.');
/// assert_eq!(Separator::from('/').to_string(), "/");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Separator(char);

impl Separator {
    /// Create a separator from `c`.
    #[must_use]
    pub const fn new(c: char) -> Self {
        Self(c)
    }

    /// The separator character.
    #[must_use]
    pub const fn as_char(self) -> char {
        self.0
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self('.')
    }
}

impl From<char> for Separator {
    fn from(c: char) -> Self {
        Self(c)
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Character marking anonymous (array element) keys in source documents.
///
/// A document key that is empty or starts with this character is stored under
/// the empty key, so `<.>` elements in XML and JSON array items share one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayKey(char);

impl ArrayKey {
    /// Create an array key from `c`.
    #[must_use]
    pub const fn new(c: char) -> Self {
        Self(c)
    }

    /// The array key character.
    #[must_use]
    pub const fn as_char(self) -> char {
        self.0
    }

    /// Whether `key` names an anonymous child.
    #[must_use]
    pub fn is_anonymous(self, key: &str) -> bool {
        key.is_empty() || key.starts_with(self.0)
    }
}

impl Default for ArrayKey {
    fn default() -> Self {
        Self('.')
    }
}

impl From<char> for ArrayKey {
    fn from(c: char) -> Self {
        Self(c)
    }
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a macro spells "resolve relative to the referencing node".
///
/// With [`LevelMarker::Separator`] every separator after the prefix walks one
/// scope up: `%param..X%` reads `X` next to the parent of the referencing node.
/// With [`LevelMarker::Custom`] the marker `c` followed by the separator means
/// "this node" and `cc` followed by the separator means "one level up", so
/// `%param^.X%` and `%param^^.X%` for `c = '^'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelMarker {
    /// Repeated separators encode the number of levels to walk up.
    #[default]
    Separator,
    /// A dedicated marker character encodes the current and parent levels.
    Custom(char),
}
