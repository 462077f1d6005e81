//! Finding the node that owns a key.
//!
//! Resolution walks down from the node being merged into, one level at a
//! time, until it stands at the level that owns the key. Missing child
//! arrays are created, short arrays are grown, and unset ids are resolved in
//! append mode and committed to the id context on the spot, so every later
//! key of the same update lands in the same slot.

use tracing::debug;

use ptree_events::Notifier;
use ptree_types::{Level, Node, NodeArray, NodePath};

use crate::error::{MergeError, MergeResult};
use crate::ids::IdContext;

/// The node a key resolved to.
#[derive(Debug)]
pub struct Resolved<'n> {
    pub node: &'n mut Node,
    pub level: Level,
    /// Position of `node` below the merge root.
    pub path: NodePath,
}

/// Walk from `node` (standing at `from`, located at `path`) down to `target`.
///
/// Descending into a plot emits `NewPlot` or `UpdatePlot` to `notifier`.
pub fn resolve<'n>(
    node: &'n mut Node,
    path: &NodePath,
    from: Level,
    target: Level,
    ids: &mut IdContext,
    notifier: &mut dyn Notifier,
) -> MergeResult<Resolved<'n>> {
    if from.is_below(target) {
        return Err(MergeError::InternalInvariantViolation(format!(
            "cannot resolve {target} from the deeper level {from}"
        )));
    }

    let mut current = node;
    let mut level = from;
    let mut path = path.clone();
    while level != target {
        let child = level.child().ok_or_else(|| {
            MergeError::InternalInvariantViolation(format!("{level} has no child level"))
        })?;
        let key = child.name();
        let array = current.node_array_entry(key).ok_or_else(|| {
            MergeError::InternalInvariantViolation(format!("{key:?} does not hold a node array"))
        })?;

        let mut id = ids.get(child);
        if id == 0 {
            id = append_id(child, array)?;
            ids.set(child, id);
            debug!(level = %child, id, "append mode");
        }
        let index = id as usize - 1;
        array.grow(index + 1, child)?;
        let next = array.get_mut(index).ok_or_else(|| {
            MergeError::InternalInvariantViolation(format!("{key:?} has no slot {index} after growing"))
        })?;
        if child == Level::Plots {
            enter_plot(next, index, notifier);
        }

        current = next;
        level = child;
        path.push(index);
    }

    Ok(Resolved {
        node: current,
        level,
        path,
    })
}

/// The 1-based id an append at `level` uses.
///
/// This is the slot after the last one, except that a trailing plot not yet
/// in use is filled first.
pub fn append_id(level: Level, array: &NodeArray) -> MergeResult<u32> {
    let mut next = array.len() + 1;
    if level == Level::Plots && array.last().and_then(Node::in_use) == Some(false) {
        next -= 1;
    }
    u32::try_from(next).map_err(|_| MergeError::AllocationFailure { requested: next })
}

/// Mark a plot as addressed and report whether it is new.
pub fn enter_plot(plot: &mut Node, index: usize, notifier: &mut dyn Notifier) {
    if plot.mark_in_use() {
        notifier.on_plot_updated(index);
    } else {
        notifier.on_new_plot(index);
    }
}
