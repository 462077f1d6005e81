use std::fmt;

use tracing::debug;

use crate::event::{EventKind, PlotEvent};
use crate::notifier::Notifier;
use crate::queue::EventQueue;

/// Filter selecting the events a handler receives.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only events of these kinds are delivered.
    pub kinds: Option<Vec<EventKind>>,
    /// If set, only events about these plots are delivered. Events without
    /// a plot (`MergeEnd`) always pass.
    pub plots: Option<Vec<usize>>,
}

impl EventFilter {
    /// A filter that accepts every event.
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter that accepts a single event kind.
    pub fn kind(kind: EventKind) -> Self {
        Self {
            kinds: Some(vec![kind]),
            plots: None,
        }
    }

    /// Returns `true` if the given event matches this filter.
    pub fn matches(&self, event: &PlotEvent) -> bool {
        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&event.kind()) {
                return false;
            }
        }
        if let (Some(plots), Some(index)) = (&self.plots, event.plot_index()) {
            if !plots.contains(&index) {
                return false;
            }
        }
        true
    }
}

/// Handle returned by [`EventDispatcher::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

struct Handler {
    id: HandlerId,
    filter: EventFilter,
    notifier: Box<dyn Notifier>,
}

/// Delivers events to registered handlers.
///
/// Each event goes to every handler whose filter matches, in registration
/// order.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Handler>,
    next_id: u64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler and return its id.
    pub fn register(&mut self, filter: EventFilter, notifier: Box<dyn Notifier>) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push(Handler {
            id,
            filter,
            notifier,
        });
        id
    }

    /// Remove a handler. Returns `false` if the id was unknown.
    pub fn unregister(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|h| h.id != id);
        self.handlers.len() != before
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Deliver one event. Returns the number of handlers that received it.
    pub fn dispatch(&mut self, event: &PlotEvent) -> usize {
        let mut delivered = 0;
        for handler in &mut self.handlers {
            if handler.filter.matches(event) {
                handler.notifier.notify(event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Drain `queue` and deliver its events oldest first.
    ///
    /// Returns the number of events processed.
    pub fn process(&mut self, queue: &mut EventQueue) -> usize {
        let mut processed = 0;
        while let Some(event) = queue.pop() {
            let delivered = self.dispatch(&event);
            debug!(event = %event, handlers = delivered, "processed event");
            processed += 1;
        }
        processed
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handler_count", &self.handlers.len())
            .finish()
    }
}
