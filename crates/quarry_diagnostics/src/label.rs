//! Labels that annotate grid regions within a diagnostic.

use quarry_common::Region;
use serde::{Deserialize, Serialize};

/// Whether a label marks the main location or supporting context.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LabelStyle {
    /// The region the diagnostic is about.
    Primary,
    /// A related region, e.g. a neighbouring cluster's box.
    Secondary,
}

/// A grid region with an explanatory message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Label {
    /// The annotated region of the board.
    pub region: Region,
    /// The message displayed next to the region.
    pub message: String,
    /// Whether this is a primary or secondary label.
    pub style: LabelStyle,
}

impl Label {
    /// Creates a primary label.
    pub fn primary(region: Region, message: impl Into<String>) -> Self {
        Self {
            region,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    /// Creates a secondary label.
    pub fn secondary(region: Region, message: impl Into<String>) -> Self {
        Self {
            region,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}
