//! Wall-clock time handling.
//!
//! Block times are the clock time at the venue, as typed into the block
//! form. They are stored with a trailing `Z` (`2024-06-01T09:00:00.000Z`),
//! but that marker is a storage convention only: the digits are the
//! wall-clock reading and are never shifted through a timezone.
//!
//! [`LocalWallClock`] makes that explicit in the type system. It wraps a
//! [`chrono::NaiveDateTime`], so there is no offset to apply by accident.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::{Result, RunsheetError};

/// Format used by `datetime-local` style form inputs.
pub const FORM_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format written to storage. The `Z` is literal.
pub const STORED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const ZULU_BODY_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A date and clock time at the event venue, with no timezone attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalWallClock(NaiveDateTime);

impl LocalWallClock {
    pub fn new(naive: NaiveDateTime) -> Self {
        Self(naive)
    }

    /// Build a wall-clock value from calendar fields, seconds zeroed.
    pub fn from_ymd_hm(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .map(Self)
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Calendar day of this reading. Used for every per-day grouping.
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Hour of day with minutes as a fraction (`09:30` is `9.5`).
    ///
    /// Only the hour and minute fields contribute, matching what the form
    /// displays.
    pub fn decimal_hour(&self) -> f64 {
        f64::from(self.hour()) + f64::from(self.minute()) / 60.0
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    /// Parse a stored value.
    ///
    /// Accepted inputs, tried in order:
    /// - `YYYY-MM-DDThh:mm[:ss[.fff]]Z`: digits are taken as written.
    /// - RFC3339 with an offset: the digits as written, offset discarded.
    /// - Naive `YYYY-MM-DD[T ]hh:mm[:ss]`.
    pub fn parse_stored(input: &str) -> Result<Self> {
        let trimmed = input.trim();

        if let Some(body) = trimmed
            .strip_suffix('Z')
            .or_else(|| trimmed.strip_suffix('z'))
        {
            for fmt in &ZULU_BODY_FORMATS {
                if let Ok(dt) = NaiveDateTime::parse_from_str(body, fmt) {
                    return Ok(Self(dt));
                }
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            debug!(input = trimmed, "discarding offset from stored wall-clock value");
            return Ok(Self(dt.naive_local()));
        }

        for fmt in &NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Ok(Self(dt));
            }
        }

        Err(RunsheetError::ParseError(format!(
            "Invalid wall-clock time: '{}'. Expected YYYY-MM-DDThh:mm",
            input
        )))
    }

    /// Storage representation, e.g. `2024-06-01T09:00:00.000Z`.
    pub fn to_stored(&self) -> String {
        self.0.format(STORED_FORMAT).to_string()
    }

    /// Form representation, e.g. `2024-06-01T09:00`.
    pub fn to_form_input(&self) -> String {
        self.0.format(FORM_INPUT_FORMAT).to_string()
    }

    /// Twelve-hour clock reading, e.g. `9:05 AM`.
    pub fn format_12h(&self) -> String {
        self.0.format("%-I:%M %p").to_string()
    }
}

impl fmt::Display for LocalWallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_stored())
    }
}

impl FromStr for LocalWallClock {
    type Err = RunsheetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_stored(s)
    }
}

impl Serialize for LocalWallClock {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_stored())
    }
}

impl<'de> Deserialize<'de> for LocalWallClock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_stored(&raw).map_err(serde::de::Error::custom)
    }
}

fn is_form_input(s: &str) -> bool {
    s.len() == 16 && NaiveDateTime::parse_from_str(s, FORM_INPUT_FORMAT).is_ok()
}

/// Convert a stored value to the `YYYY-MM-DDThh:mm` a form field shows.
///
/// Values carrying the `Z` marker are sliced positionally (date from
/// characters 0..10, clock from 11..16), so the form always shows the
/// digits that were stored. Anything else is parsed and re-read from its
/// own wall-clock fields.
///
/// ```
/// use runsheet_core::wallclock::to_form_input;
///
/// assert_eq!(
///     to_form_input("2024-06-01T23:30:00.000Z").unwrap(),
///     "2024-06-01T23:30"
/// );
/// ```
pub fn to_form_input(stored: &str) -> Result<String> {
    let trimmed = stored.trim();

    if trimmed.ends_with('Z') || trimmed.ends_with('z') {
        if let (Some(date), Some(clock)) = (trimmed.get(0..10), trimmed.get(11..16)) {
            let candidate = format!("{date}T{clock}");
            if is_form_input(&candidate) {
                return Ok(candidate);
            }
        }
    }

    debug!(input = trimmed, "stored value not in positional form, parsing");
    LocalWallClock::parse_stored(trimmed).map(|wc| wc.to_form_input())
}

/// Convert a form value to its stored representation.
///
/// An exact `YYYY-MM-DDThh:mm` gets `:00.000Z` appended verbatim. Other
/// accepted inputs are parsed and reassembled from their wall-clock fields
/// at minute resolution; seconds and fractions are dropped.
///
/// ```
/// use runsheet_core::wallclock::to_stored;
///
/// assert_eq!(
///     to_stored("2024-06-01T09:00").unwrap(),
///     "2024-06-01T09:00:00.000Z"
/// );
/// ```
pub fn to_stored(form_input: &str) -> Result<String> {
    let trimmed = form_input.trim();

    if is_form_input(trimmed) {
        return Ok(format!("{trimmed}:00.000Z"));
    }

    LocalWallClock::parse_stored(trimmed).map(|wc| format!("{}:00.000Z", wc.to_form_input()))
}
