//! Horizontal day timeline: blocks as percentages of the visible span.

use serde::{Deserialize, Serialize};

use crate::models::TimelineBlock;
use crate::window::{HourWindow, compute_visible_hour_window, hour_label};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizontalConfig {
    pub default_window: HourWindow,
}

impl Default for HorizontalConfig {
    fn default() -> Self {
        Self {
            default_window: HourWindow::new(6, 22),
        }
    }
}

/// Content level for a block bar, chosen from its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HorizontalDensity {
    /// Under 8%: title only, detail in the tooltip.
    UltraCompact,
    /// Under 15%: title and start time.
    Compact,
    /// Title, status, description when present, and the time range.
    Standard,
}

impl HorizontalDensity {
    pub fn from_width(width_pct: f64) -> Self {
        if width_pct < 8.0 {
            HorizontalDensity::UltraCompact
        } else if width_pct < 15.0 {
            HorizontalDensity::Compact
        } else {
            HorizontalDensity::Standard
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HorizontalDensity::UltraCompact => "ultra-compact",
            HorizontalDensity::Compact => "compact",
            HorizontalDensity::Standard => "standard",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HorizontalItem {
    pub block_id: String,
    pub left_pct: f64,
    pub width_pct: f64,
    pub density: HorizontalDensity,
    /// Text lines shown on the bar.
    pub lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourTick {
    pub hour: u32,
    pub label: String,
    pub left_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HorizontalLayout {
    pub window: HourWindow,
    pub ticks: Vec<HourTick>,
    pub items: Vec<HorizontalItem>,
}

/// `left` and `width` of a block as percentages of `window`.
///
/// `left` is clamped to `0..=100` and `width` to whatever remains, so a
/// bar never overflows the track.
pub fn proportional_position(block: &TimelineBlock, window: HourWindow) -> (f64, f64) {
    let total = f64::from(window.span_minutes());
    let window_start = f64::from(window.start_hour * 60);
    let start = f64::from(block.start_time.minutes_since_midnight());
    let end = f64::from(block.end_time.minutes_since_midnight());

    let left = ((start - window_start) / total * 100.0).clamp(0.0, 100.0);
    let width = ((end - start) / total * 100.0).clamp(0.0, 100.0 - left);

    (left, width)
}

fn bar_content(block: &TimelineBlock, density: HorizontalDensity) -> (Vec<String>, Option<String>) {
    match density {
        HorizontalDensity::UltraCompact => {
            let mut detail = vec![block.title.clone(), block.time_range()];
            detail.push(block.status.label().to_string());
            if let Some(description) = &block.description {
                detail.push(description.clone());
            }
            (vec![block.title.clone()], Some(detail.join("\n")))
        }
        HorizontalDensity::Compact => (
            vec![block.title.clone(), block.start_time.format_12h()],
            None,
        ),
        HorizontalDensity::Standard => {
            let mut lines = vec![block.title.clone(), block.status.label().to_string()];
            if let Some(description) = &block.description {
                lines.push(description.clone());
            }
            lines.push(block.time_range());
            (lines, None)
        }
    }
}

impl HorizontalConfig {
    pub fn compute_range(&self, blocks: &[TimelineBlock]) -> HourWindow {
        compute_visible_hour_window(blocks, self.default_window)
    }

    pub fn layout_day(&self, blocks: &[TimelineBlock]) -> HorizontalLayout {
        let window = self.compute_range(blocks);
        let span = f64::from(window.span_hours());

        let ticks = window
            .hours()
            .map(|hour| HourTick {
                hour,
                label: hour_label(hour),
                left_pct: f64::from(hour - window.start_hour) / span * 100.0,
            })
            .collect();

        let items = blocks
            .iter()
            .map(|block| {
                let (left_pct, width_pct) = proportional_position(block, window);
                let density = HorizontalDensity::from_width(width_pct);
                let (lines, tooltip) = bar_content(block, density);
                HorizontalItem {
                    block_id: block.id.clone(),
                    left_pct,
                    width_pct,
                    density,
                    lines,
                    tooltip,
                }
            })
            .collect();

        HorizontalLayout {
            window,
            ticks,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{block, same_day_block};
    use proptest::prelude::*;

    const DEFAULT: HourWindow = HourWindow::new(6, 22);

    #[test]
    fn position_is_proportional() {
        // 16 visible hours; 14:00-18:00 starts at 8/16 and spans 4/16.
        let b = block("a", "Ceremony", "2024-06-01T14:00", "2024-06-01T18:00");
        let (left, width) = proportional_position(&b, DEFAULT);
        assert_eq!(left, 50.0);
        assert_eq!(width, 25.0);
    }

    #[test]
    fn width_never_overflows() {
        let b = block("a", "Late", "2024-06-01T20:00", "2024-06-01T23:00");
        let (left, width) = proportional_position(&b, DEFAULT);
        assert_eq!(left, 87.5);
        assert_eq!(width, 12.5);
        assert!(left + width <= 100.0);

        let before = block("b", "Early", "2024-06-01T05:00", "2024-06-01T07:00");
        let (left, _) = proportional_position(&before, DEFAULT);
        assert_eq!(left, 0.0);
    }

    #[test]
    fn density_thresholds() {
        assert_eq!(HorizontalDensity::from_width(7.9), HorizontalDensity::UltraCompact);
        assert_eq!(HorizontalDensity::from_width(8.0), HorizontalDensity::Compact);
        assert_eq!(HorizontalDensity::from_width(14.9), HorizontalDensity::Compact);
        assert_eq!(HorizontalDensity::from_width(15.0), HorizontalDensity::Standard);
    }

    #[test]
    fn bar_content_follows_density() {
        let config = HorizontalConfig::default();
        let mut long = block("long", "Reception", "2024-06-01T12:00", "2024-06-01T16:00");
        long.description = Some("Canapes on the lawn".to_string());
        let blocks = vec![
            block("short", "Toast", "2024-06-01T10:00", "2024-06-01T10:15"),
            block("mid", "Photos", "2024-06-01T11:00", "2024-06-01T13:00"),
            long,
        ];

        let layout = config.layout_day(&blocks);
        assert_eq!(layout.window, DEFAULT);

        let short = &layout.items[0];
        assert_eq!(short.density, HorizontalDensity::UltraCompact);
        assert_eq!(short.lines, vec!["Toast"]);
        assert_eq!(
            short.tooltip.as_deref(),
            Some("Toast\n10:00 AM - 10:15 AM\nPending")
        );

        let mid = &layout.items[1];
        assert_eq!(mid.density, HorizontalDensity::Compact);
        assert_eq!(mid.lines, vec!["Photos", "11:00 AM"]);

        let standard = &layout.items[2];
        assert_eq!(standard.density, HorizontalDensity::Standard);
        assert_eq!(
            standard.lines,
            vec![
                "Reception",
                "Pending",
                "Canapes on the lawn",
                "12:00 PM - 4:00 PM"
            ]
        );
    }

    #[test]
    fn expands_for_late_finish() {
        let config = HorizontalConfig::default();
        let blocks = vec![block("a", "Fireworks", "2024-06-01T22:00", "2024-06-01T22:30")];
        let layout = config.layout_day(&blocks);
        assert_eq!(layout.window, HourWindow::new(6, 24));
        assert_eq!(layout.ticks.len(), 19);
        assert_eq!(layout.ticks.last().unwrap().left_pct, 100.0);
    }

    proptest! {
        #[test]
        fn bars_never_leave_the_track(
            blocks in prop::collection::vec(same_day_block(), 1..6),
            start in 0u32..12,
            span in 1u32..=12,
        ) {
            // Fixed windows clip; the computed window holds every block.
            let fixed = HourWindow::new(start, start + span);
            for b in &blocks {
                let (left, width) = proportional_position(b, fixed);
                prop_assert!((0.0..=100.0).contains(&left));
                prop_assert!(width >= 0.0);
                prop_assert!(left + width <= 100.0 + 1e-9);
            }

            let layout = HorizontalConfig::default().layout_day(&blocks);
            for item in &layout.items {
                prop_assert!(item.left_pct >= 0.0);
                prop_assert!(item.left_pct + item.width_pct <= 100.0 + 1e-9);
            }
        }
    }
}
