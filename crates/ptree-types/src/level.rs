//! The four fixed hierarchy levels of the configuration tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four nesting depths: `root → plots → subplots → series`.
///
/// Levels are ordered by depth, so `Level::Root < Level::Series`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Root,
    Plots,
    Subplots,
    Series,
}

impl Level {
    /// All levels, outermost first.
    pub const ALL: [Level; 4] = [Level::Root, Level::Plots, Level::Subplots, Level::Series];

    /// Number of levels.
    pub const COUNT: usize = Self::ALL.len();

    /// Canonical lower-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Plots => "plots",
            Self::Subplots => "subplots",
            Self::Series => "series",
        }
    }

    /// Parse a canonical level name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.name() == name)
    }

    /// Zero-based depth (root is 0).
    pub const fn depth(self) -> usize {
        match self {
            Self::Root => 0,
            Self::Plots => 1,
            Self::Subplots => 2,
            Self::Series => 3,
        }
    }

    /// The next deeper level, or `None` for `series`.
    pub const fn child(self) -> Option<Self> {
        match self {
            Self::Root => Some(Self::Plots),
            Self::Plots => Some(Self::Subplots),
            Self::Subplots => Some(Self::Series),
            Self::Series => None,
        }
    }

    /// The next shallower level, or `None` for `root`.
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Root => None,
            Self::Plots => Some(Self::Root),
            Self::Subplots => Some(Self::Plots),
            Self::Series => Some(Self::Subplots),
        }
    }

    /// Key under which the parent level stores this level's node array.
    ///
    /// The root is not an array element and has no key.
    pub const fn array_key(self) -> Option<&'static str> {
        match self {
            Self::Root => None,
            other => Some(other.name()),
        }
    }

    /// Key of the child array this level owns, if any.
    pub const fn child_key(self) -> Option<&'static str> {
        match self.child() {
            Some(child) => child.array_key(),
            None => None,
        }
    }

    /// Returns `true` if `self` is strictly deeper than `other`.
    pub fn is_below(self, other: Level) -> bool {
        self.depth() > other.depth()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
