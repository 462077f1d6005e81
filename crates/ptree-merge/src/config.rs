//! Merge configuration and its TOML loader.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use ptree_schema::{KeyLists, Schema};
use ptree_types::Level;

use crate::error::{MergeError, MergeResult};

/// Tunables of the merge engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    /// An update without a plot id is appended instead of addressing the
    /// active plot. A tree root carrying `append_plots` overrides this.
    pub append_plots: bool,
    /// Subplot id used when an update names none. `0` selects append mode.
    pub default_subplot_id: u32,
    /// Series id used when an update names none. `0` selects append mode.
    pub default_series_id: u32,
    /// Levels whose nodes are wiped on first touch in each merge call.
    pub clear_levels: Vec<Level>,
    /// Keys appended to the built-in schema.
    pub extra_keys: KeyLists,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            append_plots: true,
            default_subplot_id: 1,
            default_series_id: 1,
            clear_levels: vec![Level::Series],
            extra_keys: KeyLists::default(),
        }
    }
}

impl MergeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> MergeResult<Self> {
        let config: MergeConfig = toml::from_str(s).map_err(|e| MergeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> MergeResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| MergeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> MergeResult<()> {
        if self.clear_levels.contains(&Level::Root) {
            return Err(MergeError::Config(
                "the root level cannot be cleared on first touch".to_string(),
            ));
        }
        Ok(())
    }

    /// The built-in schema extended with [`extra_keys`](Self::extra_keys).
    pub fn schema(&self) -> MergeResult<Schema> {
        Ok(Schema::with_extra_keys(&self.extra_keys)?)
    }

    pub fn is_clear_level(&self, level: Level) -> bool {
        self.clear_levels.contains(&level)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config() {
        let c = MergeConfig::default();
        assert!(c.append_plots);
        assert_eq!(c.default_subplot_id, 1);
        assert_eq!(c.default_series_id, 1);
        assert_eq!(c.clear_levels, vec![Level::Series]);
        assert!(c.extra_keys.is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = MergeConfig::from_toml_str(
            r#"
            append_plots = false
            default_series_id = 0

            [extra_keys]
            series = ["error_bars"]
            "#,
        )
        .unwrap();
        assert!(!c.append_plots);
        assert_eq!(c.default_subplot_id, 1);
        assert_eq!(c.default_series_id, 0);
        assert_eq!(c.schema().unwrap().level_of("error_bars"), Ok(Level::Series));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = MergeConfig::from_toml_str("append_plot = true").unwrap_err();
        assert!(matches!(err, MergeError::Config(_)));
    }

    #[test]
    fn root_is_not_a_clear_level() {
        let err = MergeConfig::from_toml_str(r#"clear_levels = ["root"]"#).unwrap_err();
        assert!(err.to_string().contains("root"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"clear_levels = ["subplots", "series"]"#).unwrap();
        let c = MergeConfig::load(file.path()).unwrap();
        assert!(c.is_clear_level(Level::Subplots));
        assert!(c.is_clear_level(Level::Series));
        assert!(!c.is_clear_level(Level::Plots));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MergeConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, MergeError::Config(_)));
    }
}
