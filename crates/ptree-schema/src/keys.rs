//! Built-in key lists, one per hierarchy level.
//!
//! A key must appear in exactly one list so that a flat update mixing keys
//! of different levels can be routed unambiguously. The lists are checked
//! for disjointness at compile time.

use serde::{Deserialize, Serialize};

use ptree_types::Level;

/// Keys owned by the root node.
pub const ROOT_KEYS: &[&str] = &["plots", "append_plots", "hold_plots"];

/// Keys owned by plot nodes.
pub const PLOT_KEYS: &[&str] = &["clear", "figsize", "size", "subplots", "update"];

/// Keys owned by subplot nodes.
pub const SUBPLOT_KEYS: &[&str] = &[
    "adjust_xlim",
    "adjust_ylim",
    "adjust_zlim",
    "backgroundcolor",
    "clim",
    "colormap",
    "keep_aspect_ratio",
    "kind",
    "labels",
    "levels",
    "location",
    "nbins",
    "panzoom",
    "reset_ranges",
    "rotation",
    "series",
    "subplot",
    "tilt",
    "title",
    "xbins",
    "xflip",
    "xform",
    "xlabel",
    "xlim",
    "xlog",
    "ybins",
    "yflip",
    "ylabel",
    "ylim",
    "ylog",
    "zflip",
    "zlim",
    "zlog",
];

/// Keys owned by series nodes.
pub const SERIES_KEYS: &[&str] = &[
    "a",
    "c",
    "markertype",
    "s",
    "spec",
    "step_where",
    "u",
    "v",
    "x",
    "y",
    "z",
];

/// The built-in lists indexed by level depth.
pub const BUILTIN_KEYS: [&[&str]; Level::COUNT] = [ROOT_KEYS, PLOT_KEYS, SUBPLOT_KEYS, SERIES_KEYS];

const _: () = assert!(lists_are_disjoint(&BUILTIN_KEYS), "a key is listed for two levels");
const _: () = assert!(structural_keys_are_placed(), "child array key owned by the wrong level");

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const fn contains(list: &[&str], key: &str) -> bool {
    let mut i = 0;
    while i < list.len() {
        if str_eq(list[i], key) {
            return true;
        }
        i += 1;
    }
    false
}

/// No key appears twice, within one list or across lists.
pub const fn lists_are_disjoint(lists: &[&[&str]]) -> bool {
    let mut l = 0;
    while l < lists.len() {
        let mut k = 0;
        while k < lists[l].len() {
            let key = lists[l][k];
            let mut m = l;
            while m < lists.len() {
                let mut j = if m == l { k + 1 } else { 0 };
                while j < lists[m].len() {
                    if str_eq(lists[m][j], key) {
                        return false;
                    }
                    j += 1;
                }
                m += 1;
            }
            k += 1;
        }
        l += 1;
    }
    true
}

/// Each level's child array key is owned by that level.
const fn structural_keys_are_placed() -> bool {
    let mut d = 0;
    while d < Level::COUNT {
        if let Some(key) = Level::ALL[d].child_key() {
            if !contains(BUILTIN_KEYS[d], key) {
                return false;
            }
        }
        d += 1;
    }
    true
}

/// Additional keys per level, supplied through configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyLists {
    pub root: Vec<String>,
    pub plots: Vec<String>,
    pub subplots: Vec<String>,
    pub series: Vec<String>,
}

impl KeyLists {
    /// Keys listed for `level`.
    pub fn for_level(&self, level: Level) -> &[String] {
        match level {
            Level::Root => &self.root,
            Level::Plots => &self.plots,
            Level::Subplots => &self.subplots,
            Level::Series => &self.series,
        }
    }

    pub fn is_empty(&self) -> bool {
        Level::ALL.iter().all(|level| self.for_level(*level).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lists_are_disjoint() {
        assert!(lists_are_disjoint(&BUILTIN_KEYS));
    }

    #[test]
    fn detects_overlap_across_lists() {
        let lists: [&[&str]; 2] = [&["kind", "title"], &["x", "kind"]];
        assert!(!lists_are_disjoint(&lists));
    }

    #[test]
    fn detects_duplicate_within_a_list() {
        let lists: [&[&str]; 1] = [&["x", "y", "x"]];
        assert!(!lists_are_disjoint(&lists));
    }

    #[test]
    fn structural_keys_live_one_level_up() {
        assert!(ROOT_KEYS.contains(&"plots"));
        assert!(PLOT_KEYS.contains(&"subplots"));
        assert!(SUBPLOT_KEYS.contains(&"series"));
    }

    #[test]
    fn key_lists_deserialize_with_defaults() {
        let lists: KeyLists = serde_json::from_str(r#"{"series": ["error_bars"]}"#).unwrap();
        assert_eq!(lists.for_level(Level::Series), &["error_bars".to_string()]);
        assert!(lists.root.is_empty());
        assert!(!lists.is_empty());
        assert!(KeyLists::default().is_empty());
    }
}
