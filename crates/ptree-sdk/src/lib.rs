//! High-level SDK for the plot configuration tree.
//!
//! [`PlotTree`] owns the tree for the lifetime of a process and is the
//! only place it is mutated. Rendering code reads it back through
//! [`PlotTree::plots`] and the [`Node`] accessors.

pub mod error;
pub mod tree;

pub use error::{SdkError, SdkResult};
pub use tree::PlotTree;

// Re-export key types
pub use ptree_events::{EventFilter, EventKind, FnNotifier, HandlerId, Notifier, PlotEvent};
pub use ptree_merge::{MergeConfig, MergeReport, MergeWarning};
pub use ptree_types::{Level, Node, NodeArray, Value};
