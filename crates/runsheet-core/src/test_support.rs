//! Builders shared by the unit tests.

use chrono::NaiveDate;

use crate::models::{BlockStatus, EventInfo, TimelineBlock};
use crate::wallclock::LocalWallClock;

pub(crate) fn block(id: &str, title: &str, start: &str, end: &str) -> TimelineBlock {
    TimelineBlock {
        id: id.to_string(),
        event_id: "e1".to_string(),
        title: title.to_string(),
        start_time: LocalWallClock::parse_stored(start).unwrap(),
        end_time: LocalWallClock::parse_stored(end).unwrap(),
        location: None,
        description: None,
        personnel: None,
        equipment: None,
        notes: None,
        status: BlockStatus::Pending,
        created_at: None,
    }
}

pub(crate) fn event(start: &str, end: &str) -> EventInfo {
    EventInfo {
        id: "e1".to_string(),
        name: "Summer Gala".to_string(),
        location: Some("Riverside Pavilion".to_string()),
        start_date: NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
        end_date: NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
    }
}

/// Titled blocks that start and end on 2024-06-01, start before end.
pub(crate) fn same_day_block() -> impl proptest::strategy::Strategy<Value = TimelineBlock> {
    use proptest::prelude::*;

    (0u32..1439)
        .prop_flat_map(|start| (Just(start), (start + 1)..1440))
        .prop_map(|(start, end)| {
            let at = |m: u32| format!("2024-06-01T{:02}:{:02}", m / 60, m % 60);
            block("p", "Generated", &at(start), &at(end))
        })
}
