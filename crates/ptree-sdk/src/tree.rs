//! `PlotTree`: the owned plot tree with its merge engine and event delivery.

use tracing::{debug, info};

use ptree_events::{EventDispatcher, EventFilter, EventQueue, HandlerId, Notifier};
use ptree_merge::{MergeConfig, MergeEngine, MergeReport, MergeRequest};
use ptree_schema::Schema;
use ptree_types::{Level, Node};

use crate::error::{SdkError, SdkResult};

/// The plot configuration tree and everything needed to update it.
///
/// Events raised while merging are buffered and delivered to the registered
/// handlers once the engine returns, followed by a `MergeEnd` event.
pub struct PlotTree {
    root: Node,
    engine: MergeEngine,
    queue: EventQueue,
    dispatcher: EventDispatcher,
    /// 0-based index of the active plot.
    active: usize,
}

impl PlotTree {
    /// A fresh tree with the default configuration.
    pub fn new() -> Self {
        Self::with_engine(MergeEngine::with_schema(
            Schema::builtin(),
            MergeConfig::default(),
        ))
    }

    pub fn with_config(config: MergeConfig) -> SdkResult<Self> {
        Ok(Self::with_engine(MergeEngine::new(config)?))
    }

    fn with_engine(engine: MergeEngine) -> Self {
        Self {
            root: Node::skeleton(Level::Root),
            engine,
            queue: EventQueue::new(),
            dispatcher: EventDispatcher::new(),
            active: 0,
        }
    }

    pub fn engine(&self) -> &MergeEngine {
        &self.engine
    }

    // ---- Merging ----

    pub fn merge(&mut self, update: &Node) -> SdkResult<MergeReport> {
        self.merge_extended(update, false, None)
    }

    /// Merge without clearing the addressed plot first.
    pub fn merge_hold(&mut self, update: &Node) -> SdkResult<MergeReport> {
        self.merge_extended(update, true, None)
    }

    /// Merge and tag the completion event with `label`.
    pub fn merge_named(&mut self, update: &Node, label: &str) -> SdkResult<MergeReport> {
        self.merge_extended(update, false, Some(label))
    }

    /// Merge `update` into the tree.
    ///
    /// Plot events raised by the merge are delivered even if it fails, since
    /// the tree is not rolled back. `MergeEnd` is only sent on success.
    pub fn merge_extended(
        &mut self,
        update: &Node,
        hold: bool,
        label: Option<&str>,
    ) -> SdkResult<MergeReport> {
        let active_plot = u32::try_from(self.active + 1).map_err(|_| {
            SdkError::InvalidOperation(format!("active plot {} is out of range", self.active))
        })?;
        let request = MergeRequest {
            hold_always: hold,
            active_plot,
        };
        let result = self
            .engine
            .merge(&mut self.root, update, request, &mut self.queue);
        self.dispatcher.process(&mut self.queue);
        let report = result?;

        self.queue.on_merge_completed(label);
        self.dispatcher.process(&mut self.queue);
        info!(
            label = label.unwrap_or(""),
            hold,
            replaced = report.replaced,
            warnings = report.warnings.len(),
            "merged update"
        );
        Ok(report)
    }

    /// Convert a JSON object and merge it.
    pub fn merge_json(
        &mut self,
        json: &serde_json::Value,
        hold: bool,
        label: Option<&str>,
    ) -> SdkResult<MergeReport> {
        let update = Node::from_json(json)?;
        self.merge_extended(&update, hold, label)
    }

    // ---- Plot management ----

    /// Wipe the active plot back to an empty skeleton.
    pub fn clear(&mut self) -> SdkResult<()> {
        let active = self.active;
        let plot = self.plot_slot(active)?;
        plot.clear();
        plot.init_structure(Level::Plots);
        info!(plot = active, "cleared active plot");
        Ok(())
    }

    /// Make plot `index` (0-based) active, allocating it if needed.
    pub fn switch(&mut self, index: usize) -> SdkResult<()> {
        self.plot_slot(index)?;
        self.active = index;
        info!(plot = index, "switched active plot");
        Ok(())
    }

    fn plot_slot(&mut self, index: usize) -> SdkResult<&mut Node> {
        let plots = self
            .root
            .node_array_entry(Level::Plots.name())
            .ok_or_else(|| SdkError::InvalidOperation("\"plots\" does not hold a node array".into()))?;
        let len = index.checked_add(1).ok_or_else(|| {
            SdkError::InvalidOperation(format!("plot index {index} is out of range"))
        })?;
        plots.grow(len, Level::Plots)?;
        plots
            .get_mut(index)
            .ok_or_else(|| SdkError::InvalidOperation(format!("no plot slot {index}")))
    }

    /// Highest allocated plot index.
    pub fn max_plot_index(&self) -> usize {
        self.plots().len().saturating_sub(1)
    }

    /// Report a window size change for plot `index`.
    pub fn size_changed(&mut self, index: usize, pixel_width: i32, pixel_height: i32) {
        self.queue.on_size_changed(index, pixel_width, pixel_height);
        self.dispatcher.process(&mut self.queue);
    }

    /// Drop every plot and start over with a fresh skeleton. Handlers stay
    /// registered.
    pub fn reset(&mut self) {
        self.root = Node::skeleton(Level::Root);
        self.active = 0;
        let dropped = self.queue.drain().len();
        info!(dropped, "reset plot tree");
    }

    // ---- Events ----

    pub fn register(&mut self, filter: EventFilter, handler: Box<dyn Notifier>) -> HandlerId {
        let id = self.dispatcher.register(filter, handler);
        debug!(handler = ?id, "registered event handler");
        id
    }

    pub fn unregister(&mut self, id: HandlerId) -> bool {
        self.dispatcher.unregister(id)
    }

    // ---- Reading ----

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn plots(&self) -> &[Node] {
        self.root.children(Level::Plots)
    }

    pub fn plot(&self, index: usize) -> Option<&Node> {
        self.plots().get(index)
    }

    pub fn active_plot(&self) -> Option<&Node> {
        self.plot(self.active)
    }

    pub fn active_plot_index(&self) -> usize {
        self.active
    }

    /// The owning level of `key` in this tree's schema.
    pub fn level_of(&self, key: &str) -> SdkResult<Level> {
        Ok(self.engine.schema().level_of(key)?)
    }

    pub fn dump_json(&self) -> serde_json::Value {
        self.root.to_json()
    }
}

impl Default for PlotTree {
    fn default() -> Self {
        Self::new()
    }
}
