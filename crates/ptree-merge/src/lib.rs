//! Merge engine for the plot configuration tree.
//!
//! Incoming updates are flat or partially nested [`Node`](ptree_types::Node)s.
//! Every key is routed to the level that owns it, ids are resolved either
//! explicitly or in append mode, and the value is written into the tree.
//!
//! # Quick Start
//!
//! ```rust
//! use ptree_events::RecordingNotifier;
//! use ptree_merge::{MergeConfig, MergeEngine, MergeRequest};
//! use ptree_types::{Level, Node};
//!
//! let engine = MergeEngine::new(MergeConfig::default()).unwrap();
//! let mut root = Node::skeleton(Level::Root);
//! let update = Node::new().with("kind", "line").with("x", vec![1.0, 2.0]);
//! let mut events = RecordingNotifier::new();
//! let report = engine
//!     .merge(&mut root, &update, MergeRequest::default(), &mut events)
//!     .unwrap();
//! assert!(report.is_clean());
//! assert_eq!(root.children(Level::Plots).len(), 1);
//! ```

pub mod clear;
pub mod config;
pub mod engine;
pub mod error;
pub mod ids;
pub mod report;
pub mod resolver;

// Re-exports for convenience.
pub use clear::ClearTracker;
pub use config::MergeConfig;
pub use engine::{MergeEngine, MergeRequest, IGNORED_KEYS};
pub use error::{MergeError, MergeResult};
pub use ids::{IdContext, MergeIds};
pub use report::{MergeReport, MergeWarning};
pub use resolver::{resolve, Resolved};
