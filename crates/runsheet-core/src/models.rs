//! Core data types for runsheet.
//!
//! This module defines the primary types used throughout the library:
//! - [`BlockStatus`] - Progress state of a timeline block
//! - [`Precision`] - Minute granularity block times must align to
//! - [`TimelineBlock`] - A scheduled block as held by the store
//! - [`EventInfo`] - The owning event and its calendar date range
//! - [`Schedule`] - An event together with its blocks

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::wallclock::LocalWallClock;

/// Progress state of a timeline block.
///
/// Any status may change to any other; there is no transition table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockStatus {
    #[default]
    Pending,
    InProgress,
    Complete,
    Cancelled,
}

impl BlockStatus {
    pub const ALL: [BlockStatus; 4] = [
        BlockStatus::Pending,
        BlockStatus::InProgress,
        BlockStatus::Complete,
        BlockStatus::Cancelled,
    ];

    /// Badge text shown next to a block.
    pub fn label(self) -> &'static str {
        match self {
            BlockStatus::Pending => "Pending",
            BlockStatus::InProgress => "In Progress",
            BlockStatus::Complete => "Complete",
            BlockStatus::Cancelled => "Cancelled",
        }
    }

    /// Badge fill colour as RGB components in `0.0..=1.0`.
    pub fn badge_rgb(self) -> (f32, f32, f32) {
        match self {
            BlockStatus::Pending => (0.96, 0.76, 0.26),
            BlockStatus::InProgress => (0.23, 0.51, 0.96),
            BlockStatus::Complete => (0.13, 0.70, 0.37),
            BlockStatus::Cancelled => (0.60, 0.60, 0.60),
        }
    }
}

impl std::fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockStatus::Pending => write!(f, "pending"),
            BlockStatus::InProgress => write!(f, "in-progress"),
            BlockStatus::Complete => write!(f, "complete"),
            BlockStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for BlockStatus {
    type Err = crate::error::RunsheetError;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BlockStatus::Pending),
            "in-progress" | "in_progress" => Ok(BlockStatus::InProgress),
            "complete" => Ok(BlockStatus::Complete),
            "cancelled" => Ok(BlockStatus::Cancelled),
            _ => Err(crate::error::RunsheetError::ParseError(format!(
                "Unknown status: '{}'. Expected 'pending', 'in-progress', 'complete', or 'cancelled'",
                s
            ))),
        }
    }
}

/// Minute granularity that block start and end times must align to.
///
/// Only used while a block is being entered; it is not stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[default]
    #[serde(rename = "30min")]
    ThirtyMinutes,
}

impl Precision {
    pub fn minutes(self) -> u32 {
        match self {
            Precision::FifteenMinutes => 15,
            Precision::ThirtyMinutes => 30,
        }
    }

    /// Minute-of-hour values a time may carry under this precision.
    pub fn allowed_minutes(self) -> &'static [u32] {
        match self {
            Precision::FifteenMinutes => &[0, 15, 30, 45],
            Precision::ThirtyMinutes => &[0, 30],
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precision::FifteenMinutes => write!(f, "15min"),
            Precision::ThirtyMinutes => write!(f, "30min"),
        }
    }
}

impl std::str::FromStr for Precision {
    type Err = crate::error::RunsheetError;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s.to_lowercase().as_str() {
            "15min" | "15" => Ok(Precision::FifteenMinutes),
            "30min" | "30" => Ok(Precision::ThirtyMinutes),
            _ => Err(crate::error::RunsheetError::ParseError(format!(
                "Unknown precision: '{}'. Expected '15min' or '30min'",
                s
            ))),
        }
    }
}

/// A scheduled block as read from, and written to, the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineBlock {
    pub id: String,
    pub event_id: String,
    /// May be empty on malformed records; such blocks are ghosts.
    #[serde(default)]
    pub title: String,
    pub start_time: LocalWallClock,
    pub end_time: LocalWallClock,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personnel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: BlockStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl TimelineBlock {
    /// Length of the block in whole minutes. Negative for inverted blocks.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time.naive() - self.start_time.naive()).num_minutes()
    }

    /// 12-hour range such as `9:00 AM - 9:30 AM`.
    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format_12h(),
            self.end_time.format_12h()
        )
    }
}

/// The event that owns a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// First calendar day of the event (inclusive).
    pub start_date: NaiveDate,
    /// Last calendar day of the event (inclusive).
    pub end_date: NaiveDate,
}

/// An event and every block recorded against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub event: EventInfo,
    #[serde(default)]
    pub blocks: Vec<TimelineBlock>,
}
