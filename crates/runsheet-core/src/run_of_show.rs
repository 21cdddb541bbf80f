//! Run-of-show document model.
//!
//! [`build_run_of_show`] turns an event and its blocks into a list of
//! day sections ready for a renderer. The model holds final display
//! strings only; [`render_text`] and [`crate::pdf::render_pdf`] decide
//! how they are laid out.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::bucket::bucketize;
use crate::error::Result;
use crate::models::{BlockStatus, EventInfo, TimelineBlock};
use crate::window::hour_label;

/// Shown in place of any day sections when nothing is scheduled.
pub const NO_BLOCKS_MESSAGE: &str = "No timeline blocks are scheduled for this event.";

#[derive(Debug, Clone, Serialize)]
pub struct RunOfShow {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub date_range: String,
    pub sections: Vec<ShowSection>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ShowSection {
    Day(DaySection),
    NoBlocks,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaySection {
    pub date: NaiveDate,
    /// e.g. `Saturday, June 1, 2024`.
    pub heading: String,
    pub tally: StatusTally,
    pub elements: Vec<SectionElement>,
}

/// Block counts shown under a day heading. Cancelled blocks are not
/// tallied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub complete: usize,
    pub in_progress: usize,
    pub pending: usize,
}

impl StatusTally {
    pub fn from_blocks(blocks: &[TimelineBlock]) -> Self {
        blocks.iter().fold(Self::default(), |mut tally, block| {
            match block.status {
                BlockStatus::Complete => tally.complete += 1,
                BlockStatus::InProgress => tally.in_progress += 1,
                BlockStatus::Pending => tally.pending += 1,
                BlockStatus::Cancelled => {}
            }
            tally
        })
    }
}

impl std::fmt::Display for StatusTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Complete: {} | In Progress: {} | Pending: {}",
            self.complete, self.in_progress, self.pending
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SectionElement {
    HourDivider { hour: u32, label: String },
    Entry(ShowEntry),
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowEntry {
    pub block_id: String,
    pub title: String,
    /// e.g. `9:00 AM - 9:30 AM`.
    pub time_range: String,
    pub status: BlockStatus,
    /// Only the fields that have a value, in display order.
    pub details: Vec<EntryDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryDetail {
    pub label: &'static str,
    pub value: String,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn entry_for(block: &TimelineBlock) -> ShowEntry {
    let fields: [(&'static str, &Option<String>); 5] = [
        ("Location", &block.location),
        ("Personnel", &block.personnel),
        ("Equipment", &block.equipment),
        ("Description", &block.description),
        ("Notes", &block.notes),
    ];

    let details = fields
        .into_iter()
        .filter_map(|(label, value)| present(value).map(|value| EntryDetail { label, value }))
        .collect();

    ShowEntry {
        block_id: block.id.clone(),
        title: block.title.clone(),
        time_range: block.time_range(),
        status: block.status,
        details,
    }
}

fn day_section(date: NaiveDate, blocks: &[TimelineBlock]) -> DaySection {
    let mut elements = Vec::with_capacity(blocks.len() * 2);
    let mut previous_hour = None;

    for block in blocks {
        let hour = block.start_time.hour();
        if previous_hour != Some(hour) {
            elements.push(SectionElement::HourDivider {
                hour,
                label: hour_label(hour),
            });
            previous_hour = Some(hour);
        }
        elements.push(SectionElement::Entry(entry_for(block)));
    }

    DaySection {
        date,
        heading: format_long_date(date),
        tally: StatusTally::from_blocks(blocks),
        elements,
    }
}

/// `Saturday, June 1, 2024`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    let fmt = "%B %-d, %Y";
    if start == end {
        start.format(fmt).to_string()
    } else {
        format!("{} - {}", start.format(fmt), end.format(fmt))
    }
}

/// Build the run-of-show for `event`.
///
/// Blocks are bucketed by day (ghosts and out-of-range blocks dropped),
/// and each day with at least one block becomes a section. When no day has
/// a block the result holds a single [`ShowSection::NoBlocks`].
pub fn build_run_of_show(event: &EventInfo, blocks: &[TimelineBlock]) -> Result<RunOfShow> {
    let timeline = bucketize(event.start_date, event.end_date, blocks)?;

    let mut sections: Vec<ShowSection> = timeline
        .days
        .iter()
        .filter(|day| !day.blocks.is_empty())
        .map(|day| ShowSection::Day(day_section(day.date, &day.blocks)))
        .collect();

    if sections.is_empty() {
        sections.push(ShowSection::NoBlocks);
    }

    debug!(
        event = %event.name,
        sections = sections.len(),
        skipped = timeline.ghosts.len() + timeline.out_of_range.len(),
        "built run of show"
    );

    Ok(RunOfShow {
        title: event.name.clone(),
        location: present(&event.location),
        date_range: format_date_range(event.start_date, event.end_date),
        sections,
    })
}

/// Plain-text rendering, one line per element.
pub fn render_text(show: &RunOfShow) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "RUN OF SHOW: {}", show.title);
    if let Some(location) = &show.location {
        let _ = writeln!(out, "{location}");
    }
    let _ = writeln!(out, "{}", show.date_range);

    for section in &show.sections {
        out.push('\n');
        match section {
            ShowSection::NoBlocks => {
                let _ = writeln!(out, "{NO_BLOCKS_MESSAGE}");
            }
            ShowSection::Day(day) => {
                let _ = writeln!(out, "== {} ==", day.heading);
                let _ = writeln!(out, "{}", day.tally);
                for element in &day.elements {
                    match element {
                        SectionElement::HourDivider { label, .. } => {
                            let _ = writeln!(out, "\n-- {label} --");
                        }
                        SectionElement::Entry(entry) => {
                            let _ = writeln!(
                                out,
                                "{}  {} [{}]",
                                entry.time_range,
                                entry.title,
                                entry.status.label()
                            );
                            for detail in &entry.details {
                                let _ = writeln!(out, "    {}: {}", detail.label, detail.value);
                            }
                        }
                    }
                }
            }
        }
    }

    out
}
