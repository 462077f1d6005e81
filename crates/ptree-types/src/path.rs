use std::fmt;

/// Position of a node below a merge root, as a list of 0-based array
/// positions, one per level descended.
///
/// Array slots are never removed, so a path identifies the same node for
/// the whole lifetime of a tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The merge root itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the child at `index` below this node.
    pub fn child(&self, index: usize) -> Self {
        let mut positions = Vec::with_capacity(self.0.len() + 1);
        positions.extend_from_slice(&self.0);
        positions.push(index);
        Self(positions)
    }

    /// Descend in place.
    pub fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    /// Number of levels below the merge root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn positions(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for position in &self.0 {
            write!(f, "/{position}")?;
        }
        Ok(())
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(positions: Vec<usize>) -> Self {
        Self(positions)
    }
}
