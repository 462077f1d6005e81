//! Configuration nodes and growable node arrays.
//!
//! # Invariants
//!
//! - The node at position `i` of any [`NodeArray`] built by [`NodeArray::grow`]
//!   has `array_index == Some(i)`.
//! - Arrays only grow; slots are never removed, so positions stay stable for
//!   the lifetime of the tree.
//! - Only `plots`-level elements carry an `in_use` flag.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{TypeError, TypeResult};
use crate::level::Level;
use crate::value::Value;

/// An insertion-ordered mapping from attribute key to [`Value`].
///
/// Nodes that are elements of a tree array additionally carry bookkeeping
/// that is not part of the attribute map: their position (`array_index`)
/// and, for plot nodes, whether a merge has addressed them yet (`in_use`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    attributes: IndexMap<String, Value>,
    array_index: Option<usize>,
    in_use: Option<bool>,
}

impl Node {
    /// Create an empty node with no bookkeeping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh array element for `level` at position `index`.
    ///
    /// Plot elements start with `in_use = false`. The element receives the
    /// structural skeleton of the levels below it.
    pub fn element(level: Level, index: usize) -> Self {
        let mut node = Self::skeleton(level);
        node.array_index = Some(index);
        if level == Level::Plots {
            node.in_use = Some(false);
        }
        node
    }

    /// Build the empty structural skeleton for a node at `level`.
    ///
    /// Every level below `level` holds a one-element array, so a fresh root
    /// owns one plot, which owns one subplot, which owns one series.
    pub fn skeleton(level: Level) -> Self {
        let mut node = Self::new();
        node.init_structure(level);
        node
    }

    /// Add the child array for the level below `level` if it is missing.
    ///
    /// Existing child arrays are left untouched.
    pub fn init_structure(&mut self, level: Level) {
        let Some(child) = level.child() else {
            return;
        };
        let key = child.name();
        if !self.attributes.contains_key(key) {
            let array = NodeArray::from(vec![Node::element(child, 0)]);
            self.attributes.insert(key.to_string(), Value::NodeArray(array));
        }
    }

    /// Builder-style insert, for constructing updates.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    // ---------------------------------------------------------------
    // Attributes
    // ---------------------------------------------------------------

    /// Replace the value stored under `key`, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.attributes.get_mut(key)
    }

    /// Remove an attribute, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Number of attributes (bookkeeping excluded).
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Wipe every attribute. `array_index` and `in_use` survive.
    pub fn clear(&mut self) {
        self.attributes.clear();
    }

    // ---------------------------------------------------------------
    // Bookkeeping
    // ---------------------------------------------------------------

    /// Position within the parent array, if this node is an array element.
    pub fn array_index(&self) -> Option<usize> {
        self.array_index
    }

    /// `Some(flag)` for plot elements, `None` elsewhere.
    pub fn in_use(&self) -> Option<bool> {
        self.in_use
    }

    /// Mark this node as addressed by a merge. Returns the previous flag.
    pub fn mark_in_use(&mut self) -> bool {
        self.in_use.replace(true).unwrap_or(false)
    }

    // ---------------------------------------------------------------
    // Structure
    // ---------------------------------------------------------------

    /// The node array stored under `key`, if the key holds one.
    pub fn node_array(&self, key: &str) -> Option<&NodeArray> {
        self.get(key).and_then(Value::as_node_array)
    }

    /// The node array stored under `key`, inserting an empty one if absent.
    ///
    /// Returns `None` if the key exists but holds another kind of value.
    pub fn node_array_entry(&mut self, key: &str) -> Option<&mut NodeArray> {
        self.attributes
            .entry(key.to_string())
            .or_insert_with(|| Value::NodeArray(NodeArray::new()))
            .as_node_array_mut()
    }

    /// Ordered child nodes of `level` stored directly in this node.
    ///
    /// Returns an empty slice for the root level or when the array is absent.
    pub fn children(&self, level: Level) -> &[Node] {
        level
            .array_key()
            .and_then(|key| self.node_array(key))
            .map(NodeArray::as_slice)
            .unwrap_or(&[])
    }
}

/// An ordered, growable sequence of child nodes.
///
/// The length of a `NodeArray` is independent of any value array stored next
/// to it. Growing appends fresh nodes and never disturbs existing slots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeArray {
    nodes: Vec<Node>,
}

impl NodeArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    pub fn last(&self) -> Option<&Node> {
        self.nodes.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.nodes.iter_mut()
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    /// Grow the array to `new_len` elements of `level`.
    ///
    /// Each new slot is a [`Node::element`] whose `array_index` is its
    /// position. Does nothing if the array is already long enough. Returns
    /// the number of slots added.
    pub fn grow(&mut self, new_len: usize, level: Level) -> TypeResult<usize> {
        let old_len = self.nodes.len();
        if new_len <= old_len {
            return Ok(0);
        }
        let added = new_len - old_len;
        self.nodes
            .try_reserve(added)
            .map_err(|_| TypeError::AllocationFailure { requested: added })?;
        self.nodes
            .extend((old_len..new_len).map(|index| Node::element(level, index)));
        debug!(level = %level, from = old_len, to = new_len, "grew node array");
        Ok(added)
    }
}

impl From<Vec<Node>> for NodeArray {
    fn from(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

impl<'a> IntoIterator for &'a NodeArray {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Attributes
    // -----------------------------------------------------------------------

    #[test]
    fn insert_replaces_and_keeps_order() {
        let mut node = Node::new().with("kind", "line").with("title", "a");
        let previous = node.insert("kind", "scatter");
        assert_eq!(previous, Some(Value::from("line")));
        let keys: Vec<_> = node.keys().collect();
        assert_eq!(keys, vec!["kind", "title"]);
        assert_eq!(node.get("kind").and_then(Value::as_str), Some("scatter"));
    }

    #[test]
    fn remove_preserves_remaining_order() {
        let mut node = Node::new().with("a", 1).with("b", 2).with("c", 3);
        node.remove("a");
        let keys: Vec<_> = node.keys().collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn clear_keeps_bookkeeping() {
        let mut node = Node::element(Level::Plots, 3);
        node.insert("figsize", vec![4.0, 3.0]);
        node.mark_in_use();
        node.clear();
        assert!(node.is_empty());
        assert_eq!(node.array_index(), Some(3));
        assert_eq!(node.in_use(), Some(true));
    }

    // -----------------------------------------------------------------------
    // Skeleton and elements
    // -----------------------------------------------------------------------

    #[test]
    fn root_skeleton_has_one_node_per_level() {
        let root = Node::skeleton(Level::Root);
        let plots = root.children(Level::Plots);
        assert_eq!(plots.len(), 1);
        let subplots = plots[0].children(Level::Subplots);
        assert_eq!(subplots.len(), 1);
        let series = subplots[0].children(Level::Series);
        assert_eq!(series.len(), 1);
        assert!(series[0].is_empty());
    }

    #[test]
    fn only_plot_elements_track_in_use() {
        assert_eq!(Node::element(Level::Plots, 0).in_use(), Some(false));
        assert_eq!(Node::element(Level::Subplots, 0).in_use(), None);
        assert_eq!(Node::element(Level::Series, 0).in_use(), None);
    }

    #[test]
    fn mark_in_use_returns_previous_flag() {
        let mut plot = Node::element(Level::Plots, 0);
        assert!(!plot.mark_in_use());
        assert!(plot.mark_in_use());
    }

    #[test]
    fn init_structure_does_not_replace_existing_children() {
        let mut subplot = Node::skeleton(Level::Subplots);
        subplot
            .node_array_entry("series")
            .unwrap()
            .grow(3, Level::Series)
            .unwrap();
        subplot.init_structure(Level::Subplots);
        assert_eq!(subplot.children(Level::Series).len(), 3);
    }

    #[test]
    fn children_of_missing_array_is_empty() {
        let node = Node::new();
        assert!(node.children(Level::Plots).is_empty());
        assert!(node.children(Level::Root).is_empty());
    }

    #[test]
    fn node_array_entry_rejects_other_kinds() {
        let mut node = Node::new().with("series", 5);
        assert!(node.node_array_entry("series").is_none());
        assert!(node.node_array_entry("plots").is_some());
        assert!(node.contains_key("plots"));
    }

    // -----------------------------------------------------------------------
    // Growth
    // -----------------------------------------------------------------------

    #[test]
    fn grow_assigns_positions_and_keeps_existing_slots() {
        let mut array = NodeArray::from(vec![Node::element(Level::Plots, 0)]);
        array.get_mut(0).unwrap().insert("size", vec![640.0, 480.0]);

        let added = array.grow(5, Level::Plots).unwrap();
        assert_eq!(added, 4);
        assert_eq!(array.len(), 5);
        assert!(array.get(0).unwrap().contains_key("size"));
        for (i, node) in array.iter().enumerate() {
            assert_eq!(node.array_index(), Some(i));
            assert_eq!(node.in_use(), Some(false));
        }
    }

    #[test]
    fn grow_never_shrinks() {
        let mut array = NodeArray::new();
        array.grow(3, Level::Series).unwrap();
        assert_eq!(array.grow(1, Level::Series).unwrap(), 0);
        assert_eq!(array.len(), 3);
    }

    #[test]
    fn grown_subplots_get_a_series_skeleton() {
        let mut array = NodeArray::new();
        array.grow(2, Level::Subplots).unwrap();
        let second = array.get(1).unwrap();
        assert_eq!(second.children(Level::Series).len(), 1);
        assert_eq!(second.children(Level::Series)[0].array_index(), Some(0));
    }
}
