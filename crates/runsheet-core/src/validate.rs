//! Validation of block form submissions.
//!
//! A [`BlockDraft`] is what the create/edit form submits. It becomes a
//! [`ValidBlock`] only when every rule passes; otherwise every violation is
//! reported against its field and nothing reaches the store.

use serde::Deserialize;
use uuid::Uuid;

use crate::error::ValidationErrors;
use crate::interval::{alignment_message, is_aligned};
use crate::models::{BlockStatus, Precision};
use crate::wallclock::LocalWallClock;

/// Raw form input for creating or editing a block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockDraft {
    pub event_id: String,
    #[serde(default)]
    pub title: String,
    /// Form (`YYYY-MM-DDThh:mm`) or stored representation.
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub personnel: Option<String>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<BlockStatus>,
    #[serde(default)]
    pub precision: Precision,
}

/// A draft that passed every rule. Optional text is trimmed and empty
/// strings are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBlock {
    pub event_id: String,
    pub title: String,
    pub start_time: LocalWallClock,
    pub end_time: LocalWallClock,
    pub location: Option<String>,
    pub description: Option<String>,
    pub personnel: Option<String>,
    pub equipment: Option<String>,
    pub notes: Option<String>,
    pub status: BlockStatus,
}

fn normalize(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn check_time(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: &str,
    precision: Precision,
) -> Option<LocalWallClock> {
    match LocalWallClock::parse_stored(raw) {
        Ok(t) if is_aligned(t, precision) => Some(t),
        Ok(_) => {
            errors.push(field, alignment_message(precision));
            None
        }
        Err(_) => {
            errors.push(field, "Enter a valid date and time");
            None
        }
    }
}

impl BlockDraft {
    /// Check every field rule and the end-after-start rule.
    pub fn validate(&self) -> Result<ValidBlock, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if Uuid::parse_str(self.event_id.trim()).is_err() {
            errors.push("event_id", "Event id must be a valid UUID");
        }

        let title = self.title.trim();
        if title.is_empty() {
            errors.push("title", "Title is required");
        }

        let start = check_time(&mut errors, "start_time", &self.start_time, self.precision);
        let end = check_time(&mut errors, "end_time", &self.end_time, self.precision);

        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                errors.push("end_time", "End time must be after start time");
            }
        }

        match (start, end) {
            (Some(start_time), Some(end_time)) if errors.is_empty() => Ok(ValidBlock {
                event_id: self.event_id.trim().to_string(),
                title: title.to_string(),
                start_time,
                end_time,
                location: normalize(&self.location),
                description: normalize(&self.description),
                personnel: normalize(&self.personnel),
                equipment: normalize(&self.equipment),
                notes: normalize(&self.notes),
                status: self.status.unwrap_or_default(),
            }),
            _ => Err(errors),
        }
    }
}
