//! Visible hour window shared by the vertical and horizontal layouts.
//!
//! Both views start from a default window (08-20 and 06-22 by default) and
//! grow it when a block falls outside. Growth adds one hour of padding past
//! the outlying block; a block ending between 22:00 and 23:00 earns one
//! more hour so it is not clipped. The window never shrinks below the
//! default and never leaves `0..=24`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RunsheetError};
use crate::models::TimelineBlock;

/// Hours of padding added past an outlying block.
pub const PADDING_HOURS: u32 = 1;

/// A range of whole hours, `start_hour` inclusive to `end_hour` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl HourWindow {
    pub const fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn span_hours(&self) -> u32 {
        self.end_hour.saturating_sub(self.start_hour)
    }

    pub fn span_minutes(&self) -> u32 {
        self.span_hours() * 60
    }

    /// True when `other` lies entirely inside this window.
    pub fn contains(&self, other: &HourWindow) -> bool {
        self.start_hour <= other.start_hour && other.end_hour <= self.end_hour
    }

    pub fn hours(&self) -> impl Iterator<Item = u32> {
        self.start_hour..=self.end_hour
    }

    pub fn validate(&self, name: &str) -> Result<()> {
        if self.end_hour > 24 || self.start_hour >= self.end_hour {
            return Err(RunsheetError::InvalidRange(format!(
                "{} window {:02}:00-{:02}:00 must satisfy start < end <= 24",
                name, self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }
}

/// Label for an hour gridline, e.g. `8 AM`, `12 PM`.
pub fn hour_label(hour: u32) -> String {
    let suffix = if hour % 24 < 12 { "AM" } else { "PM" };
    let h12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{h12} {suffix}")
}

fn ends_late(block: &TimelineBlock) -> bool {
    let end = block.end_time.decimal_hour();
    end > 22.0 && end < 23.0
}

/// Grow `default` until it holds every block, with padding.
pub fn compute_visible_hour_window(blocks: &[TimelineBlock], default: HourWindow) -> HourWindow {
    let mut window = default;

    let earliest = blocks
        .iter()
        .map(|b| b.start_time.decimal_hour())
        .reduce(f64::min);
    let latest = blocks
        .iter()
        .map(|b| b.end_time.decimal_hour())
        .reduce(f64::max);

    if let Some(earliest) = earliest {
        if earliest < f64::from(default.start_hour) {
            let floored = earliest.floor() as u32;
            window.start_hour = floored.saturating_sub(PADDING_HOURS);
        }
    }

    if let Some(latest) = latest {
        if latest > f64::from(default.end_hour) {
            let mut padded = latest.ceil() as u32 + PADDING_HOURS;
            if blocks.iter().any(ends_late) {
                padded += 1;
            }
            window.end_hour = padded.min(24);
        }
    }

    if window != default {
        debug!(
            start = window.start_hour,
            end = window.end_hour,
            "expanded visible hour window"
        );
    }

    window
}
