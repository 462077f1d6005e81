//! Tracks which nodes a merge call has already cleared.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use ptree_types::{Level, NodePath};

/// Records which nodes of the clearable levels were already wiped during one
/// outer merge call.
///
/// Nodes are identified by their [`NodePath`] from the merge root. The
/// tracker lives in the merge context and is dropped with it.
#[derive(Clone, Debug, Default)]
pub struct ClearTracker {
    levels: Vec<Level>,
    cleared: HashMap<Level, HashSet<NodePath>>,
}

impl ClearTracker {
    pub fn new(levels: impl IntoIterator<Item = Level>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
            cleared: HashMap::new(),
        }
    }

    pub fn is_clearable(&self, level: Level) -> bool {
        self.levels.contains(&level)
    }

    /// Returns `true` the first time `path` is asked about for `level`.
    ///
    /// Always `false` for levels that are not clearable.
    pub fn should_clear(&mut self, level: Level, path: &NodePath) -> bool {
        if !self.is_clearable(level) {
            return false;
        }
        let first = self.cleared.entry(level).or_default().insert(path.clone());
        if first {
            debug!(level = %level, path = %path, "first touch, clearing");
        }
        first
    }

    /// Number of nodes cleared so far.
    pub fn cleared_count(&self) -> usize {
        self.cleared.values().map(HashSet::len).sum()
    }
}
