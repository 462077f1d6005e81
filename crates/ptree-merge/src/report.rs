use std::fmt;

use serde::Serialize;

use ptree_types::Level;

/// A non-fatal problem found while merging. The offending key is skipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeWarning {
    /// The key is not assigned to any level.
    UnknownKey { key: String },
    /// The key belongs to a level above the one being merged.
    MisplacedKey { key: String, owner: Level, level: Level },
}

impl MergeWarning {
    pub fn key(&self) -> &str {
        match self {
            Self::UnknownKey { key } | Self::MisplacedKey { key, .. } => key,
        }
    }
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey { key } => {
                write!(f, "the key {key:?} is not assigned to any hierarchy level")
            }
            Self::MisplacedKey { key, owner, level } => {
                write!(f, "the {owner} key {key:?} cannot be set inside {level}")
            }
        }
    }
}

/// Summary of one merge call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub warnings: Vec<MergeWarning>,
    /// Leaf values written.
    pub replaced: usize,
    /// Structural keys merged element by element.
    pub structural: usize,
    /// Nodes wiped before being written.
    pub cleared: usize,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Fold the report of another merge call into this one.
    pub fn absorb(&mut self, other: MergeReport) {
        self.warnings.extend(other.warnings);
        self.replaced += other.replaced;
        self.structural += other.structural;
        self.cleared += other.cleared;
    }
}
