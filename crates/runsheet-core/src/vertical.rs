//! Vertical day timeline: one column, fixed pixels per hour.
//!
//! Offsets are computed from the wall-clock hour and minute of each block,
//! never from an instant, so a block typed as 09:00 is drawn at 09:00
//! whatever the viewer's timezone.

use serde::{Deserialize, Serialize};

use crate::models::{BlockStatus, TimelineBlock};
use crate::window::{HourWindow, compute_visible_hour_window, hour_label};

/// Layout settings for the vertical timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticalConfig {
    /// Pixel height of one hour row.
    pub hour_height: f64,
    pub default_window: HourWindow,
}

impl Default for VerticalConfig {
    fn default() -> Self {
        Self {
            hour_height: 80.0,
            default_window: HourWindow::new(8, 20),
        }
    }
}

/// Pixel placement of a block inside the day column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockGeometry {
    pub top: f64,
    pub height: f64,
}

/// How much of a block's content fits, chosen from its duration alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalDensity {
    /// 15 minutes or less: single line.
    UltraCompact,
    /// Up to 30 minutes.
    Compact,
    /// Between 30 and 60 minutes.
    Medium,
    /// An hour or more: full card with metadata.
    Full,
}

impl VerticalDensity {
    pub fn from_minutes(minutes: i64) -> Self {
        if minutes <= 15 {
            VerticalDensity::UltraCompact
        } else if minutes <= 30 {
            VerticalDensity::Compact
        } else if minutes < 60 {
            VerticalDensity::Medium
        } else {
            VerticalDensity::Full
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VerticalDensity::UltraCompact => "ultra-compact",
            VerticalDensity::Compact => "compact",
            VerticalDensity::Medium => "medium",
            VerticalDensity::Full => "full",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HourMark {
    pub hour: u32,
    pub label: String,
    pub offset: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerticalItem {
    pub block_id: String,
    pub title: String,
    pub status: BlockStatus,
    pub time_range: String,
    pub geometry: BlockGeometry,
    pub density: VerticalDensity,
}

/// A laid-out day column.
#[derive(Debug, Clone, Serialize)]
pub struct VerticalLayout {
    pub window: HourWindow,
    pub total_height: f64,
    pub hour_marks: Vec<HourMark>,
    pub items: Vec<VerticalItem>,
}

impl VerticalConfig {
    /// Visible hours for a set of same-day blocks.
    pub fn compute_range(&self, blocks: &[TimelineBlock]) -> HourWindow {
        compute_visible_hour_window(blocks, self.default_window)
    }

    /// Top offset and height for `block` in a column starting at `start_hour`.
    ///
    /// `top` is clamped at zero; `height` is the block's length in hours
    /// times [`VerticalConfig::hour_height`].
    pub fn compute_geometry(&self, block: &TimelineBlock, start_hour: u32) -> BlockGeometry {
        let start = block.start_time.decimal_hour();
        let end = block.end_time.decimal_hour();

        BlockGeometry {
            top: ((start - f64::from(start_hour)) * self.hour_height).max(0.0),
            height: (end - start) * self.hour_height,
        }
    }

    /// Lay out one day's blocks.
    pub fn layout_day(&self, blocks: &[TimelineBlock]) -> VerticalLayout {
        let window = self.compute_range(blocks);

        let hour_marks = window
            .hours()
            .map(|hour| HourMark {
                hour,
                label: hour_label(hour),
                offset: f64::from(hour - window.start_hour) * self.hour_height,
            })
            .collect();

        let items = blocks
            .iter()
            .map(|block| VerticalItem {
                block_id: block.id.clone(),
                title: block.title.clone(),
                status: block.status,
                time_range: block.time_range(),
                geometry: self.compute_geometry(block, window.start_hour),
                density: VerticalDensity::from_minutes(block.duration_minutes()),
            })
            .collect();

        VerticalLayout {
            window,
            total_height: f64::from(window.span_hours()) * self.hour_height,
            hour_marks,
            items,
        }
    }
}
