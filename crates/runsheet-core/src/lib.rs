//! # runsheet-core
//!
//! Timeline engine for event run-of-show schedules.
//!
//! A timeline is a set of blocks (title, start, end, status, and free-text
//! details) belonging to an event that spans one or more calendar days.
//! This crate validates and rounds block times, groups blocks by day while
//! isolating malformed "ghost" blocks, computes vertical and horizontal
//! layout geometry, and builds the printable run-of-show document.
//!
//! ## Wall-clock times
//!
//! Block times are venue wall-clock readings. They are stored as
//! `2024-06-01T09:00:00.000Z`, but the `Z` is a storage convention; no
//! timezone conversion is ever applied. See [`wallclock`].
//!
//! ## Example
//!
//! ```rust
//! use runsheet_core::prelude::*;
//!
//! let start = LocalWallClock::parse_stored("2024-06-01T09:10").unwrap();
//! let rounded = round(start, Precision::ThirtyMinutes);
//! assert_eq!(rounded.to_stored(), "2024-06-01T09:00:00.000Z");
//! ```

pub mod bucket;
pub mod config;
pub mod error;
pub mod horizontal;
pub mod interval;
pub mod models;
pub mod pdf;
pub mod refresh;
pub mod run_of_show;
pub mod store;
pub mod validate;
pub mod vertical;
pub mod wallclock;
pub mod window;

#[cfg(test)]
mod test_support;

// Re-export commonly used types at the crate root
pub use bucket::{BucketedTimeline, DayBucket, GhostBlock, GhostReason, bucketize, detect_ghost};
pub use config::EngineConfig;
pub use error::{FieldError, Result, RunsheetError, ValidationErrors};
pub use interval::{is_aligned, precision_of, reround, round};
pub use models::{BlockStatus, EventInfo, Precision, Schedule, TimelineBlock};
pub use run_of_show::{RunOfShow, build_run_of_show, render_text};
pub use store::{BlockStore, MemoryStore, TimelineService};
pub use validate::{BlockDraft, ValidBlock};
pub use wallclock::LocalWallClock;
pub use window::{HourWindow, compute_visible_hour_window};

/// Prelude module for convenient imports.
///
/// ```
/// use runsheet_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bucket::{BucketedTimeline, GhostReason, bucketize, detect_ghost};
    pub use crate::config::EngineConfig;
    pub use crate::error::{Result, RunsheetError};
    pub use crate::horizontal::HorizontalConfig;
    pub use crate::interval::{is_aligned, precision_of, reround, round};
    pub use crate::models::*;
    pub use crate::pdf::{PageConfig, render_pdf};
    pub use crate::run_of_show::{build_run_of_show, render_text};
    pub use crate::store::{BlockStore, MemoryStore, TimelineService};
    pub use crate::validate::BlockDraft;
    pub use crate::vertical::VerticalConfig;
    pub use crate::wallclock::{LocalWallClock, to_form_input, to_stored};
    pub use crate::window::HourWindow;
}
