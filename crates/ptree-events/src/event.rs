use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of plot events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A plot was addressed for the first time.
    NewPlot,
    /// An already used plot was addressed again.
    UpdatePlot,
    /// The window of a plot changed its pixel size.
    SizeChanged,
    /// A merge call completed.
    MergeEnd,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NewPlot => "NewPlot",
            Self::UpdatePlot => "UpdatePlot",
            Self::SizeChanged => "SizeChanged",
            Self::MergeEnd => "MergeEnd",
        };
        write!(f, "{s}")
    }
}

/// A notification about the lifecycle of the configuration tree.
///
/// Plot indices are 0-based positions in the root's `plots` array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotEvent {
    NewPlot {
        index: usize,
    },
    UpdatePlot {
        index: usize,
    },
    SizeChanged {
        index: usize,
        pixel_width: i32,
        pixel_height: i32,
    },
    MergeEnd {
        /// Caller-supplied label of the completed merge.
        label: Option<String>,
    },
}

impl PlotEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::NewPlot { .. } => EventKind::NewPlot,
            Self::UpdatePlot { .. } => EventKind::UpdatePlot,
            Self::SizeChanged { .. } => EventKind::SizeChanged,
            Self::MergeEnd { .. } => EventKind::MergeEnd,
        }
    }

    /// The plot this event refers to, if any.
    pub fn plot_index(&self) -> Option<usize> {
        match self {
            Self::NewPlot { index } | Self::UpdatePlot { index } => Some(*index),
            Self::SizeChanged { index, .. } => Some(*index),
            Self::MergeEnd { .. } => None,
        }
    }
}

impl fmt::Display for PlotEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewPlot { index } | Self::UpdatePlot { index } => {
                write!(f, "{} plot={index}", self.kind())
            }
            Self::SizeChanged {
                index,
                pixel_width,
                pixel_height,
            } => write!(f, "SizeChanged plot={index} {pixel_width}x{pixel_height}"),
            Self::MergeEnd { label: Some(label) } => write!(f, "MergeEnd label={label}"),
            Self::MergeEnd { label: None } => write!(f, "MergeEnd"),
        }
    }
}
