//! The recursive merge.
//!
//! Each key of an update is routed through the [`Schema`] to the level that
//! owns it, resolved to a concrete node, and then either merged element by
//! element (child array keys) or written as a leaf. State that must span the
//! whole outer call, the clear tracker and the report, lives in a
//! merge context created by [`MergeEngine::merge`] and threaded through
//! every recursive step.

use tracing::{debug, warn};

use ptree_events::Notifier;
use ptree_schema::Schema;
use ptree_types::{Level, Node, NodePath, Value};

use crate::clear::ClearTracker;
use crate::config::MergeConfig;
use crate::error::{MergeError, MergeResult};
use crate::ids::{IdContext, MergeIds, ID_KEY, PLOT_ID_KEY, SERIES_ID_KEY, SUBPLOT_ID_KEY};
use crate::report::{MergeReport, MergeWarning};
use crate::resolver;

/// Keys that address or describe nodes and are never copied into the tree.
pub const IGNORED_KEYS: &[&str] = &[
    ID_KEY,
    PLOT_ID_KEY,
    SUBPLOT_ID_KEY,
    SERIES_ID_KEY,
    "array_index",
    "in_use",
];

const HOLD_PLOTS_KEY: &str = "hold_plots";
const APPEND_PLOTS_KEY: &str = "append_plots";

/// Caller-side parameters of one merge call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeRequest {
    /// Never clear the addressed plot up front.
    pub hold_always: bool,
    /// 1-based plot addressed by updates without a plot id when appending is
    /// off.
    pub active_plot: u32,
}

impl Default for MergeRequest {
    fn default() -> Self {
        Self {
            hold_always: false,
            active_plot: 1,
        }
    }
}

impl MergeRequest {
    pub fn hold() -> Self {
        Self {
            hold_always: true,
            ..Self::default()
        }
    }
}

/// State shared by every recursive step of one outer merge call.
struct MergeContext<'a> {
    tracker: ClearTracker,
    report: MergeReport,
    request: MergeRequest,
    append_plots: bool,
    notifier: &'a mut dyn Notifier,
}

impl MergeContext<'_> {
    fn warn(&mut self, warning: MergeWarning) {
        warn!(key = warning.key(), "{warning}, skipping");
        self.report.warnings.push(warning);
    }
}

/// Merges partial updates into a configuration tree.
#[derive(Clone, Debug)]
pub struct MergeEngine {
    schema: Schema,
    config: MergeConfig,
}

impl MergeEngine {
    /// Build an engine, deriving the schema from `config`.
    pub fn new(config: MergeConfig) -> MergeResult<Self> {
        config.validate()?;
        let schema = config.schema()?;
        Ok(Self { schema, config })
    }

    /// Build an engine around an existing schema. `config.extra_keys` is
    /// not consulted.
    pub fn with_schema(schema: Schema, config: MergeConfig) -> Self {
        Self { schema, config }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merge `update` into the tree rooted at `root`.
    ///
    /// Plot lifecycle events go to `notifier`. Unknown and misplaced keys are
    /// reported in the returned [`MergeReport`]; any error aborts the call
    /// and leaves the mutations applied so far in place.
    pub fn merge(
        &self,
        root: &mut Node,
        update: &Node,
        request: MergeRequest,
        notifier: &mut dyn Notifier,
    ) -> MergeResult<MergeReport> {
        let append_plots = root
            .get(APPEND_PLOTS_KEY)
            .and_then(Value::as_flag)
            .unwrap_or(self.config.append_plots);
        let mut ctx = MergeContext {
            tracker: ClearTracker::new(self.config.clear_levels.iter().copied()),
            report: MergeReport::default(),
            request,
            append_plots,
            notifier,
        };
        self.merge_node(
            &mut ctx,
            root,
            update,
            Level::Root,
            &NodePath::root(),
            &IdContext::new(),
        )?;
        debug!(
            replaced = ctx.report.replaced,
            structural = ctx.report.structural,
            cleared = ctx.report.cleared,
            warnings = ctx.report.warnings.len(),
            "merge completed"
        );
        Ok(ctx.report)
    }

    fn default_ids(&self, ctx: &MergeContext<'_>) -> MergeIds {
        let plot = if ctx.append_plots {
            0
        } else {
            ctx.request.active_plot
        };
        MergeIds::new(
            plot,
            self.config.default_subplot_id,
            self.config.default_series_id,
        )
    }

    fn merge_node(
        &self,
        ctx: &mut MergeContext<'_>,
        target: &mut Node,
        update: &Node,
        level: Level,
        path: &NodePath,
        parent_ids: &IdContext,
    ) -> MergeResult<()> {
        let mut ids = parent_ids.overlay(MergeIds::from_node(update), self.default_ids(ctx));

        if level == Level::Root && !ctx.request.hold_always {
            self.clear_addressed_plot(ctx, target, update, &ids)?;
        }

        for (key, value) in update.iter() {
            if IGNORED_KEYS.contains(&key) {
                continue;
            }
            let owner = match self.schema.level_of(key) {
                Ok(owner) => owner,
                Err(_) => {
                    ctx.warn(MergeWarning::UnknownKey {
                        key: key.to_string(),
                    });
                    continue;
                }
            };
            if level.is_below(owner) {
                ctx.warn(MergeWarning::MisplacedKey {
                    key: key.to_string(),
                    owner,
                    level,
                });
                continue;
            }

            let resolved = resolver::resolve(target, path, level, owner, &mut ids, ctx.notifier)?;
            if ctx.tracker.should_clear(resolved.level, &resolved.path) {
                resolved.node.clear();
                ctx.report.cleared += 1;
            }

            if resolved.level.child_key() == Some(key) {
                self.merge_structural(
                    ctx,
                    resolved.node,
                    key,
                    value,
                    resolved.level,
                    &resolved.path,
                    &ids,
                )?;
            } else {
                debug!(key, level = %resolved.level, path = %resolved.path, "replacing value");
                resolved.node.insert(key, value.clone());
                ctx.report.replaced += 1;
            }
        }
        Ok(())
    }

    /// Wipe the addressed plot before a non-holding merge writes to it.
    ///
    /// A plot is cleared when `hold_plots` is explicitly false, or when it is
    /// absent and the update addresses plot 1. Appends never clear.
    fn clear_addressed_plot(
        &self,
        ctx: &mut MergeContext<'_>,
        root: &mut Node,
        update: &Node,
        ids: &IdContext,
    ) -> MergeResult<()> {
        let plot_id = ids.get(Level::Plots);
        if plot_id == 0 {
            return Ok(());
        }
        let hold = update
            .get(HOLD_PLOTS_KEY)
            .or_else(|| root.get(HOLD_PLOTS_KEY))
            .and_then(Value::as_flag);
        let clear = match hold {
            Some(hold) => !hold,
            None => plot_id == 1,
        };
        if !clear {
            debug!(plot = plot_id, "holding plot");
            return Ok(());
        }

        let index = plot_id as usize - 1;
        let plots = root.node_array_entry(Level::Plots.name()).ok_or_else(|| {
            MergeError::InternalInvariantViolation("\"plots\" does not hold a node array".into())
        })?;
        plots.grow(index + 1, Level::Plots)?;
        let plot = plots.get_mut(index).ok_or_else(|| {
            MergeError::InternalInvariantViolation(format!("no plot slot {index} after growing"))
        })?;
        plot.clear();
        plot.init_structure(Level::Plots);
        ctx.report.cleared += 1;
        debug!(plot = index, "cleared plot before merge");
        Ok(())
    }

    /// Merge the elements of a child array key pairwise by position.
    #[allow(clippy::too_many_arguments)]
    fn merge_structural(
        &self,
        ctx: &mut MergeContext<'_>,
        owner: &mut Node,
        key: &str,
        value: &Value,
        owner_level: Level,
        path: &NodePath,
        ids: &IdContext,
    ) -> MergeResult<()> {
        let incoming: &[Node] = match value {
            Value::Node(node) => std::slice::from_ref(node),
            Value::NodeArray(array) => array.as_slice(),
            // `[]` carries no element type and decodes as a flat array.
            Value::IntArray(v) if v.is_empty() => &[],
            Value::DoubleArray(v) if v.is_empty() => &[],
            Value::StringArray(v) if v.is_empty() => &[],
            other => {
                return Err(MergeError::StructuralDimensionUnsupported {
                    key: key.to_string(),
                    found: other.kind(),
                })
            }
        };
        let child_level = owner_level.child().ok_or_else(|| {
            MergeError::InternalInvariantViolation(format!("{owner_level} has no child level"))
        })?;
        let existing = owner.node_array_entry(key).ok_or_else(|| {
            MergeError::InternalInvariantViolation(format!("{key:?} does not hold a node array"))
        })?;
        existing.grow(incoming.len(), child_level)?;
        ctx.report.structural += 1;

        for (index, element) in incoming.iter().enumerate() {
            let slot = existing.get_mut(index).ok_or_else(|| {
                MergeError::InternalInvariantViolation(format!("{key:?} has no slot {index}"))
            })?;
            if child_level == Level::Plots {
                resolver::enter_plot(slot, index, ctx.notifier);
            }
            debug!(key, index, "recursive merge");
            self.merge_node(ctx, slot, element, child_level, &path.child(index), ids)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ptree_events::NullNotifier;

    use super::*;

    fn engine() -> MergeEngine {
        MergeEngine::new(MergeConfig::default()).unwrap()
    }

    #[test]
    fn ignored_keys_are_not_copied() {
        let mut root = Node::skeleton(Level::Root);
        let update = Node::new()
            .with("id", "1:1:1")
            .with("array_index", 7)
            .with("in_use", 0)
            .with("x", vec![1.0]);
        let report = engine()
            .merge(&mut root, &update, MergeRequest::default(), &mut NullNotifier)
            .unwrap();
        assert_eq!(report.replaced, 1);
        let series = &root.children(Level::Plots)[0].children(Level::Subplots)[0]
            .children(Level::Series)[0];
        assert!(!series.contains_key("id"));
        assert!(!series.contains_key("array_index"));
        assert_eq!(series.array_index(), Some(0));
    }

    #[test]
    fn structural_value_must_hold_nodes() {
        let mut root = Node::skeleton(Level::Root);
        let update = Node::new().with("id", "1").with("series", vec![1.0, 2.0]);
        let err = engine()
            .merge(&mut root, &update, MergeRequest::default(), &mut NullNotifier)
            .unwrap_err();
        assert_eq!(
            err,
            MergeError::StructuralDimensionUnsupported {
                key: "series".into(),
                found: ptree_types::ValueKind::DoubleArray,
            }
        );
    }

    #[test]
    fn empty_structural_array_merges_nothing() {
        let mut root = Node::skeleton(Level::Root);
        let update = Node::new()
            .with("id", "1:1")
            .with("kind", "line")
            .with("series", Vec::<f64>::new());
        let report = engine()
            .merge(&mut root, &update, MergeRequest::hold(), &mut NullNotifier)
            .unwrap();
        assert!(report.warnings.is_empty());
        let subplot = &root.children(Level::Plots)[0].children(Level::Subplots)[0];
        assert_eq!(subplot.get("kind").and_then(Value::as_str), Some("line"));
        assert_eq!(subplot.children(Level::Series).len(), 1);
    }

    #[test]
    fn single_node_is_a_one_element_structural_merge() {
        let mut root = Node::skeleton(Level::Root);
        let update = Node::new()
            .with("id", "1")
            .with("series", Node::new().with("x", vec![1.0]));
        let report = engine()
            .merge(&mut root, &update, MergeRequest::default(), &mut NullNotifier)
            .unwrap();
        assert_eq!(report.structural, 1);
        let series = root.children(Level::Plots)[0].children(Level::Subplots)[0]
            .children(Level::Series);
        assert_eq!(series.len(), 1);
        assert!(series[0].contains_key("x"));
    }

    #[test]
    fn tree_append_plots_overrides_config() {
        let mut root = Node::skeleton(Level::Root).with("append_plots", 0);
        let update = Node::new().with("kind", "line");
        let request = MergeRequest {
            hold_always: true,
            active_plot: 1,
        };
        let engine = engine();
        engine.merge(&mut root, &update, request, &mut NullNotifier).unwrap();
        engine.merge(&mut root, &update, request, &mut NullNotifier).unwrap();
        assert_eq!(root.children(Level::Plots).len(), 1);
    }

    #[test]
    fn with_schema_uses_the_given_schema() {
        let root_keys: &[&str] = &["plots"];
        let plot_keys: &[&str] = &["subplots"];
        let subplot_keys: &[&str] = &["series"];
        let series_keys: &[&str] = &["w"];
        let schema = Schema::new([root_keys, plot_keys, subplot_keys, series_keys]).unwrap();
        let engine = MergeEngine::with_schema(schema, MergeConfig::default());
        let mut root = Node::skeleton(Level::Root);
        let update = Node::new().with("w", 1).with("x", vec![1.0]);
        let report = engine
            .merge(&mut root, &update, MergeRequest::hold(), &mut NullNotifier)
            .unwrap();
        assert_eq!(report.replaced, 1);
        assert_eq!(report.warnings, vec![MergeWarning::UnknownKey { key: "x".into() }]);
    }
}
