//! Id extraction from updates and the per-call id context.
//!
//! Ids are 1-based. `0` means "unset" and makes the resolver pick a slot in
//! append mode.

use std::fmt;

use tracing::{debug, warn};

use ptree_types::{Level, Node, Value};

/// Keys that carry addressing.
pub const ID_KEY: &str = "id";
pub const PLOT_ID_KEY: &str = "plot_id";
pub const SUBPLOT_ID_KEY: &str = "subplot_id";
pub const SERIES_ID_KEY: &str = "series_id";

const SEPARATORS: [char; 2] = [':', '.'];

/// Plot, subplot and series ids named by one update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MergeIds {
    pub plot: u32,
    pub subplot: u32,
    pub series: u32,
}

impl MergeIds {
    pub const fn new(plot: u32, subplot: u32, series: u32) -> Self {
        Self {
            plot,
            subplot,
            series,
        }
    }

    /// Parse a combined id string.
    ///
    /// Segments are plot, subplot and series, in that order, separated by
    /// `:` or `.` interchangeably. Missing, empty and `0` segments are unset.
    /// A segment that is not an unsigned integer is logged and left unset.
    /// Segments past the third are ignored.
    pub fn parse(s: &str) -> Self {
        let mut ids = [0u32; 3];
        for (slot, segment) in ids.iter_mut().zip(s.split(SEPARATORS)) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            match segment.parse::<u32>() {
                Ok(id) => *slot = id,
                Err(_) => warn!(id = s, segment, "invalid id segment"),
            }
        }
        let [plot, subplot, series] = ids;
        Self::new(plot, subplot, series)
    }

    /// Extract the ids an update addresses.
    ///
    /// A string `id` attribute wins; otherwise the integer attributes
    /// `plot_id`, `subplot_id` and `series_id` are read.
    pub fn from_node(update: &Node) -> Self {
        if let Some(combined) = update.get(ID_KEY).and_then(Value::as_str) {
            return Self::parse(combined);
        }
        Self::new(
            int_id(update, PLOT_ID_KEY),
            int_id(update, SUBPLOT_ID_KEY),
            int_id(update, SERIES_ID_KEY),
        )
    }

    /// The id for `level`. The root has none.
    pub fn get(&self, level: Level) -> u32 {
        match level {
            Level::Root => 0,
            Level::Plots => self.plot,
            Level::Subplots => self.subplot,
            Level::Series => self.series,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.plot == 0 && self.subplot == 0 && self.series == 0
    }
}

impl fmt::Display for MergeIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.plot, self.subplot, self.series)
    }
}

fn int_id(update: &Node, key: &str) -> u32 {
    match update.get(key).and_then(Value::as_int) {
        Some(id) => u32::try_from(id).unwrap_or_else(|_| {
            warn!(key, id, "id out of range");
            0
        }),
        None => 0,
    }
}

/// Resolved id per level for one merge call.
///
/// Every recursive merge step works on its own copy, so ids committed while
/// merging one child array element do not leak into its siblings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdContext {
    ids: [Option<u32>; 3],
}

impl IdContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(level: Level) -> Option<usize> {
        level.depth().checked_sub(1)
    }

    /// The id recorded for `level`, `0` if none.
    pub fn get(&self, level: Level) -> u32 {
        Self::slot(level)
            .and_then(|i| self.ids[i])
            .unwrap_or(0)
    }

    pub fn contains(&self, level: Level) -> bool {
        Self::slot(level).is_some_and(|i| self.ids[i].is_some())
    }

    /// Record `id` for `level`, replacing any earlier one.
    pub fn set(&mut self, level: Level, id: u32) {
        if let Some(i) = Self::slot(level) {
            self.ids[i] = Some(id);
        }
    }

    /// Record `id` for `level` only if nothing is recorded yet.
    pub fn insert_default(&mut self, level: Level, id: u32) {
        if let Some(i) = Self::slot(level) {
            self.ids[i].get_or_insert(id);
        }
    }

    /// A copy with `ids` applied on top.
    ///
    /// Explicit (non-zero) ids replace what is recorded; unset ids fall back
    /// to `defaults` for levels that have nothing recorded.
    pub fn overlay(&self, ids: MergeIds, defaults: MergeIds) -> Self {
        let mut next = self.clone();
        for level in [Level::Plots, Level::Subplots, Level::Series] {
            let id = ids.get(level);
            if id > 0 {
                next.set(level, id);
            } else {
                next.insert_default(level, defaults.get(level));
            }
        }
        debug!(context = %next, "resolved id context");
        next
    }
}

impl fmt::Display for IdContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [plot, subplot, series] = self.ids.map(|id| id.unwrap_or(0));
        write!(f, "{plot}:{subplot}:{series}")
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    // -----------------------------------------------------------------------
    // Combined id strings
    // -----------------------------------------------------------------------

    #[test]
    fn segments_are_plot_subplot_series() {
        assert_eq!(MergeIds::parse("2:1:3"), MergeIds::new(2, 1, 3));
    }

    #[test]
    fn separators_are_interchangeable() {
        assert_eq!(MergeIds::parse("2.1:3"), MergeIds::new(2, 1, 3));
        assert_eq!(MergeIds::parse("2:1.3"), MergeIds::new(2, 1, 3));
        assert_eq!(MergeIds::parse("2.1.3"), MergeIds::new(2, 1, 3));
    }

    #[test]
    fn zero_and_empty_segments_are_unset() {
        assert_eq!(MergeIds::parse("0:2:0"), MergeIds::new(0, 2, 0));
        assert_eq!(MergeIds::parse("::4"), MergeIds::new(0, 0, 4));
        assert_eq!(MergeIds::parse("3"), MergeIds::new(3, 0, 0));
        assert!(MergeIds::parse("").is_unset());
    }

    #[test]
    fn invalid_segment_is_unset() {
        assert_eq!(MergeIds::parse("2:x:3"), MergeIds::new(2, 0, 3));
        assert_eq!(MergeIds::parse("-1"), MergeIds::new(0, 0, 0));
    }

    #[test]
    fn extra_segments_are_ignored() {
        assert_eq!(MergeIds::parse("1:2:3:4"), MergeIds::new(1, 2, 3));
    }

    // -----------------------------------------------------------------------
    // Extraction from updates
    // -----------------------------------------------------------------------

    #[test]
    fn combined_id_takes_precedence() {
        let update = Node::new()
            .with(ID_KEY, "4:2")
            .with(PLOT_ID_KEY, 9)
            .with(SERIES_ID_KEY, 7);
        assert_eq!(MergeIds::from_node(&update), MergeIds::new(4, 2, 0));
    }

    #[test]
    fn separate_int_attributes() {
        let update = Node::new().with(PLOT_ID_KEY, 3).with(SERIES_ID_KEY, 2);
        assert_eq!(MergeIds::from_node(&update), MergeIds::new(3, 0, 2));
    }

    #[test]
    fn negative_int_id_is_unset() {
        let update = Node::new().with(PLOT_ID_KEY, -2);
        assert!(MergeIds::from_node(&update).is_unset());
    }

    // -----------------------------------------------------------------------
    // Id context
    // -----------------------------------------------------------------------

    #[test]
    fn overlay_replaces_explicit_and_defaults_the_rest() {
        let mut parent = IdContext::new();
        parent.set(Level::Plots, 2);
        parent.set(Level::Series, 5);

        let next = parent.overlay(MergeIds::new(0, 3, 0), MergeIds::new(0, 1, 1));
        assert_eq!(next.get(Level::Plots), 2);
        assert_eq!(next.get(Level::Subplots), 3);
        assert_eq!(next.get(Level::Series), 5);
        // the parent copy is untouched
        assert_eq!(parent.get(Level::Subplots), 0);
        assert!(!parent.contains(Level::Subplots));
    }

    #[test]
    fn insert_default_keeps_committed_ids() {
        let mut ctx = IdContext::new();
        ctx.insert_default(Level::Plots, 0);
        ctx.set(Level::Plots, 4);
        ctx.insert_default(Level::Plots, 1);
        assert_eq!(ctx.get(Level::Plots), 4);
    }

    #[test]
    fn root_has_no_id() {
        let mut ctx = IdContext::new();
        ctx.set(Level::Root, 3);
        assert_eq!(ctx.get(Level::Root), 0);
        assert!(!ctx.contains(Level::Root));
    }

    proptest! {
        #[test]
        fn formatted_ids_parse_back(
            plot in 0u32..10_000,
            subplot in 0u32..10_000,
            series in 0u32..10_000,
            first in prop::sample::select(vec![':', '.']),
            second in prop::sample::select(vec![':', '.']),
        ) {
            let s = format!("{plot}{first}{subplot}{second}{series}");
            prop_assert_eq!(MergeIds::parse(&s), MergeIds::new(plot, subplot, series));
        }

        #[test]
        fn parse_never_panics(s in ".*") {
            let _ = MergeIds::parse(&s);
        }
    }
}
