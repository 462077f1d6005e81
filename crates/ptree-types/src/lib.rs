//! Foundation types for the plot configuration tree.
//!
//! The tree has four fixed nesting levels: a root node owning `plots`, each
//! plot owning `subplots`, each subplot owning `series`. Every other crate in
//! the workspace depends on `ptree-types`.
//!
//! # Key Types
//!
//! - [`Level`]: One of the four hierarchy depths
//! - [`Value`]: Closed tagged union of scalars, arrays, and child nodes
//! - [`Node`]: Insertion-ordered attribute map plus array bookkeeping
//! - [`NodeArray`]: Growable, never-shrinking sequence of child nodes
//! - [`NodePath`]: Position of a node below a merge root

pub mod convert;
pub mod error;
pub mod level;
pub mod node;
pub mod path;
pub mod value;

pub use error::{check_equal_lengths, TypeError, TypeResult};
pub use level::Level;
pub use node::{Node, NodeArray};
pub use path::NodePath;
pub use value::{Value, ValueKind};
