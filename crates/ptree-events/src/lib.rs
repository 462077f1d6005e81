//! Plot lifecycle events for the configuration tree.
//!
//! The merge engine reports plot-level changes through the [`Notifier`]
//! trait. [`EventQueue`] buffers those reports during a merge, and
//! [`EventDispatcher`] delivers the buffered events to registered handlers
//! once the merge call returns.

pub mod dispatch;
pub mod event;
pub mod notifier;
pub mod queue;

pub use dispatch::{EventDispatcher, EventFilter, HandlerId};
pub use event::{EventKind, PlotEvent};
pub use notifier::{FnNotifier, Notifier, NullNotifier, RecordingNotifier};
pub use queue::EventQueue;
