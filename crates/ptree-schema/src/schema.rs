//! The key-to-level lookup table.

use std::collections::HashMap;

use tracing::debug;

use ptree_types::Level;

use crate::error::{SchemaError, SchemaResult};
use crate::keys::{KeyLists, BUILTIN_KEYS};

/// Immutable mapping from attribute key to the level that owns it.
///
/// Built once at initialization from one key list per level. Lookups are
/// O(1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    owners: HashMap<String, Level>,
}

impl Schema {
    /// Build a schema from one key list per level, outermost level first.
    ///
    /// Fails if a key is listed for more than one level.
    pub fn new<S: AsRef<str>>(lists: [&[S]; Level::COUNT]) -> SchemaResult<Self> {
        let mut schema = Self {
            owners: HashMap::with_capacity(lists.iter().map(|l| l.len()).sum()),
        };
        for (level, keys) in Level::ALL.into_iter().zip(lists) {
            for key in keys {
                schema.assign(key.as_ref(), level)?;
            }
        }
        Ok(schema)
    }

    /// The schema built from the built-in key lists.
    pub fn builtin() -> Self {
        let mut owners = HashMap::new();
        for (level, keys) in Level::ALL.into_iter().zip(BUILTIN_KEYS) {
            for key in keys {
                owners.insert((*key).to_string(), level);
            }
        }
        Self { owners }
    }

    /// The built-in schema extended with `extra` keys.
    pub fn with_extra_keys(extra: &KeyLists) -> SchemaResult<Self> {
        let mut schema = Self::builtin();
        for level in Level::ALL {
            for key in extra.for_level(level) {
                schema.assign(key, level)?;
            }
        }
        if !extra.is_empty() {
            debug!(keys = schema.len(), "extended schema with configured keys");
        }
        Ok(schema)
    }

    fn assign(&mut self, key: &str, level: Level) -> SchemaResult<()> {
        if let Some(first) = self.owners.get(key) {
            return Err(SchemaError::DuplicateKey {
                key: key.to_string(),
                first: *first,
                second: level,
            });
        }
        self.owners.insert(key.to_string(), level);
        Ok(())
    }

    /// The level that owns `key`.
    pub fn level_of(&self, key: &str) -> SchemaResult<Level> {
        self.owners
            .get(key)
            .copied()
            .ok_or_else(|| SchemaError::UnknownKey(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.owners.contains_key(key)
    }

    /// All keys owned by `level`, sorted.
    pub fn keys_for(&self, level: Level) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .owners
            .iter()
            .filter(|(_, owner)| **owner == level)
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Total number of recognized keys.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::builtin()
    }
}
