use std::collections::VecDeque;

use tracing::debug;

use crate::event::PlotEvent;
use crate::notifier::Notifier;

/// FIFO buffer of pending events.
///
/// The queue is itself a [`Notifier`], so the merge engine can report into
/// it without knowing who consumes the events afterwards.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<PlotEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PlotEvent) {
        debug!(event = %event, "enqueued event");
        self.pending.push_back(event);
    }

    pub fn pop(&mut self) -> Option<PlotEvent> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<PlotEvent> {
        self.pending.drain(..).collect()
    }
}

impl Notifier for EventQueue {
    fn notify(&mut self, event: &PlotEvent) {
        self.push(event.clone());
    }
}
