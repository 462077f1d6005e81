//! The observer interface and its stock implementations.

use crate::event::PlotEvent;

/// Receives plot lifecycle notifications.
///
/// Implementors provide [`notify`](Notifier::notify); the `on_*` helpers
/// build the matching [`PlotEvent`] and forward it.
pub trait Notifier {
    fn notify(&mut self, event: &PlotEvent);

    fn on_new_plot(&mut self, index: usize) {
        self.notify(&PlotEvent::NewPlot { index });
    }

    fn on_plot_updated(&mut self, index: usize) {
        self.notify(&PlotEvent::UpdatePlot { index });
    }

    fn on_size_changed(&mut self, index: usize, pixel_width: i32, pixel_height: i32) {
        self.notify(&PlotEvent::SizeChanged {
            index,
            pixel_width,
            pixel_height,
        });
    }

    fn on_merge_completed(&mut self, label: Option<&str>) {
        self.notify(&PlotEvent::MergeEnd {
            label: label.map(str::to_string),
        });
    }
}

/// Discards every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _event: &PlotEvent) {}
}

/// Keeps every notification, in arrival order.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    events: Vec<PlotEvent>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[PlotEvent] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<PlotEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, event: &PlotEvent) {
        self.events.push(event.clone());
    }
}

/// Adapts a closure into a [`Notifier`].
pub struct FnNotifier<F>(pub F);

impl<F: FnMut(&PlotEvent)> Notifier for FnNotifier<F> {
    fn notify(&mut self, event: &PlotEvent) {
        (self.0)(event);
    }
}

impl<F> std::fmt::Debug for FnNotifier<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnNotifier")
    }
}
