//! Per-day bucketing of timeline blocks.
//!
//! This module groups blocks into one bucket per calendar day of the
//! event. Every day in the range gets a bucket, even when empty. Days are
//! taken from the wall-clock calendar fields of each block, so a block at
//! 23:30 always lands on its own date.
//!
//! Malformed blocks ("ghosts") are kept out of every bucket and returned
//! separately so they can be shown in a cleanup list instead.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, RunsheetError};
use crate::models::TimelineBlock;

/// Why a block was classified as a ghost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GhostReason {
    /// Start is later than end.
    Inverted,
    /// Start and end fall on different calendar days.
    CrossesMidnight,
    /// Title is empty or whitespace.
    MissingTitle,
}

impl std::fmt::Display for GhostReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GhostReason::Inverted => write!(f, "start is after end"),
            GhostReason::CrossesMidnight => write!(f, "crosses midnight"),
            GhostReason::MissingTitle => write!(f, "missing title"),
        }
    }
}

/// A block excluded from display, with the first rule it broke.
#[derive(Debug, Clone, Serialize)]
pub struct GhostBlock {
    pub block: TimelineBlock,
    pub reason: GhostReason,
}

/// Blocks starting on one calendar day, ordered by start time.
#[derive(Debug, Clone, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub blocks: Vec<TimelineBlock>,
}

/// Result of bucketing an event's blocks.
#[derive(Debug, Clone, Serialize)]
pub struct BucketedTimeline {
    /// One entry per day of the event, in date order.
    pub days: Vec<DayBucket>,
    pub ghosts: Vec<GhostBlock>,
    /// Well-formed blocks whose start date is outside the event.
    pub out_of_range: Vec<TimelineBlock>,
}

impl BucketedTimeline {
    /// Ids offered to the cleanup flow: ghosts first, then out-of-range.
    pub fn cleanup_ids(&self) -> Vec<String> {
        self.ghosts
            .iter()
            .map(|g| g.block.id.clone())
            .chain(self.out_of_range.iter().map(|b| b.id.clone()))
            .collect()
    }

    /// Number of blocks placed in day buckets.
    pub fn scheduled_count(&self) -> usize {
        self.days.iter().map(|d| d.blocks.len()).sum()
    }
}

/// Classify a block as a ghost, or `None` when it is well formed.
///
/// Rules are checked in order: inverted interval, crossing midnight,
/// missing title. A block whose start equals its end is not a ghost here;
/// the form validator rejects that case before it is written.
pub fn detect_ghost(block: &TimelineBlock) -> Option<GhostReason> {
    if block.start_time > block.end_time {
        Some(GhostReason::Inverted)
    } else if block.start_time.date() != block.end_time.date() {
        Some(GhostReason::CrossesMidnight)
    } else if block.title.trim().is_empty() {
        Some(GhostReason::MissingTitle)
    } else {
        None
    }
}

/// Iterate over every calendar day from `start` to `end`, inclusive.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Group `blocks` into per-day buckets for an event running from
/// `start_date` to `end_date` (inclusive).
///
/// # Errors
///
/// Returns [`RunsheetError::InvalidRange`] when `end_date` is before
/// `start_date`.
pub fn bucketize(
    start_date: NaiveDate,
    end_date: NaiveDate,
    blocks: &[TimelineBlock],
) -> Result<BucketedTimeline> {
    if end_date < start_date {
        return Err(RunsheetError::InvalidRange(format!(
            "event ends ({}) before it starts ({})",
            end_date, start_date
        )));
    }

    let mut days: Vec<DayBucket> = days_in_range(start_date, end_date)
        .map(|date| DayBucket {
            date,
            blocks: Vec::new(),
        })
        .collect();
    let mut ghosts = Vec::new();
    let mut out_of_range = Vec::new();

    for block in blocks {
        if let Some(reason) = detect_ghost(block) {
            debug!(id = %block.id, %reason, "ghost block");
            ghosts.push(GhostBlock {
                block: block.clone(),
                reason,
            });
            continue;
        }

        let date = block.start_time.date();
        if date < start_date || date > end_date {
            debug!(id = %block.id, %date, "block outside event range");
            out_of_range.push(block.clone());
            continue;
        }

        let index = (date - start_date).num_days() as usize;
        days[index].blocks.push(block.clone());
    }

    for day in &mut days {
        day.blocks.sort_by_key(|b| b.start_time);
    }

    Ok(BucketedTimeline {
        days,
        ghosts,
        out_of_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::block;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn setup_block_lands_on_first_day() {
        let blocks = vec![block("b1", "Setup", "2024-06-01T09:00", "2024-06-01T09:30")];
        let timeline = bucketize(date("2024-06-01"), date("2024-06-02"), &blocks).unwrap();

        assert_eq!(timeline.days.len(), 2);
        assert_eq!(timeline.days[0].date, date("2024-06-01"));
        assert_eq!(timeline.days[0].blocks.len(), 1);
        assert!(timeline.days[1].blocks.is_empty());
        assert!(timeline.ghosts.is_empty());
    }

    #[test]
    fn one_bucket_per_day_even_when_empty() {
        let timeline = bucketize(date("2024-02-27"), date("2024-03-02"), &[]).unwrap();
        let dates: Vec<String> = timeline.days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(
            dates,
            vec![
                "2024-02-27",
                "2024-02-28",
                "2024-02-29",
                "2024-03-01",
                "2024-03-02"
            ]
        );
    }

    #[test]
    fn single_day_event() {
        let timeline = bucketize(date("2024-06-01"), date("2024-06-01"), &[]).unwrap();
        assert_eq!(timeline.days.len(), 1);
    }

    #[test]
    fn inverted_range_is_an_error() {
        let result = bucketize(date("2024-06-02"), date("2024-06-01"), &[]);
        assert!(matches!(result, Err(RunsheetError::InvalidRange(_))));
    }

    #[test]
    fn blocks_sorted_within_day() {
        let blocks = vec![
            block("late", "Dinner", "2024-06-01T19:00", "2024-06-01T21:00"),
            block("early", "Breakfast", "2024-06-01T07:00", "2024-06-01T08:00"),
            block("mid", "Lunch", "2024-06-01T12:00", "2024-06-01T13:00"),
        ];
        let timeline = bucketize(date("2024-06-01"), date("2024-06-01"), &blocks).unwrap();
        let ids: Vec<&str> = timeline.days[0].blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "mid", "late"]);
    }

    #[test]
    fn ghost_rules() {
        let inverted = block(
            "g1",
            "Inverted",
            "2024-06-01T10:00:00.001Z",
            "2024-06-01T10:00:00.000Z",
        );
        assert_eq!(detect_ghost(&inverted), Some(GhostReason::Inverted));

        let midnight = block("g2", "Late", "2024-06-01T23:50", "2024-06-02T00:10");
        assert_eq!(detect_ghost(&midnight), Some(GhostReason::CrossesMidnight));

        let untitled = block("g3", "  ", "2024-06-01T10:00", "2024-06-01T11:00");
        assert_eq!(detect_ghost(&untitled), Some(GhostReason::MissingTitle));

        let normal = block("ok", "Soundcheck", "2024-06-01T10:00", "2024-06-01T11:00");
        assert_eq!(detect_ghost(&normal), None);
    }

    #[test]
    fn ghosts_never_reach_a_bucket() {
        let blocks = vec![
            block("g", "Late", "2024-06-01T23:50", "2024-06-02T00:10"),
            block("ok", "Soundcheck", "2024-06-01T10:00", "2024-06-01T11:00"),
        ];
        let timeline = bucketize(date("2024-06-01"), date("2024-06-02"), &blocks).unwrap();

        assert_eq!(timeline.scheduled_count(), 1);
        assert_eq!(timeline.ghosts.len(), 1);
        assert_eq!(timeline.ghosts[0].reason, GhostReason::CrossesMidnight);
        assert_eq!(timeline.cleanup_ids(), vec!["g".to_string()]);
    }

    #[test]
    fn out_of_range_blocks_are_excluded() {
        let blocks = vec![
            block("before", "Load-in", "2024-05-31T09:00", "2024-05-31T10:00"),
            block("after", "Strike", "2024-06-03T09:00", "2024-06-03T10:00"),
        ];
        let timeline = bucketize(date("2024-06-01"), date("2024-06-02"), &blocks).unwrap();

        assert_eq!(timeline.days.len(), 2);
        assert_eq!(timeline.scheduled_count(), 0);
        assert_eq!(timeline.out_of_range.len(), 2);
        assert!(timeline.ghosts.is_empty());
        assert_eq!(timeline.cleanup_ids(), vec!["before", "after"]);
    }
}
