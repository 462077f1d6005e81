//! Key-to-level schema for the plot configuration tree.
//!
//! Every recognized attribute key belongs to exactly one [`Level`]. The
//! merge engine uses the schema to route keys of a flat update to the node
//! that owns them.
//!
//! [`Level`]: ptree_types::Level

pub mod error;
pub mod keys;
pub mod schema;

pub use error::{SchemaError, SchemaResult};
pub use keys::{KeyLists, PLOT_KEYS, ROOT_KEYS, SERIES_KEYS, SUBPLOT_KEYS};
pub use schema::Schema;
