use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use chrono::NaiveDate;
use runsheet_core::{
    BlockDraft, BlockStatus, EngineConfig, MemoryStore, Precision, Schedule, TimelineBlock,
    TimelineService, precision_of,
};
use serde::Serialize;
use tracing::debug;

use crate::cli::DraftArgs;
use crate::error::{CliError, CliResult};

pub fn parse_precision(s: &str) -> CliResult<Precision> {
    Precision::from_str(s).map_err(|_| {
        CliError::input(format!(
            "Invalid precision '{}'. Expected: 15min, 30min",
            s
        ))
    })
}

pub fn parse_status(s: &str) -> CliResult<BlockStatus> {
    BlockStatus::from_str(s).map_err(|_| {
        CliError::input(format!(
            "Invalid status '{}'. Expected: pending, in-progress, complete, cancelled",
            s
        ))
    })
}

pub fn parse_date(s: &str) -> CliResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| CliError::input(format!("Invalid date '{}'. Expected: YYYY-MM-DD", s)))
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// Read the engine config. No path means defaults.
pub fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: EngineConfig = toml::from_str(&raw)
        .map_err(|e| CliError::input(format!("Invalid config '{}': {}", path.display(), e)))?;
    config.validate()?;

    debug!(?config, "loaded config");
    Ok(config)
}

pub fn load_schedule(path: &Path) -> CliResult<Schedule> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schedule file: {}", path.display()))?;
    let schedule: Schedule = serde_json::from_str(&raw).map_err(|e| {
        CliError::input(format!("Invalid schedule '{}': {}", path.display(), e))
    })?;

    debug!(
        event = %schedule.event.id,
        blocks = schedule.blocks.len(),
        "loaded schedule"
    );
    Ok(schedule)
}

/// Write the schedule back, replacing the file only once the new
/// contents are fully on disk.
pub fn save_schedule(path: &Path, schedule: &Schedule) -> CliResult<()> {
    let mut json = serde_json::to_string_pretty(schedule)
        .map_err(|e| CliError::runtime(format!("Failed to serialize schedule: {}", e)))?;
    json.push('\n');

    let staging = path.with_extension("json.tmp");
    fs::write(&staging, json)
        .with_context(|| format!("Failed to write {}", staging.display()))?;
    fs::rename(&staging, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

/// Load a schedule, run `op` against a store seeded with its blocks, and
/// save the result.
pub fn with_service<T>(
    path: &Path,
    op: impl FnOnce(&Schedule, &mut TimelineService<MemoryStore>) -> CliResult<T>,
) -> CliResult<T> {
    let mut schedule = load_schedule(path)?;
    let mut service = TimelineService::new(MemoryStore::with_blocks(schedule.blocks.clone()));

    let value = op(&schedule, &mut service)?;

    let mut blocks = service.into_store().into_blocks();
    blocks.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
    schedule.blocks = blocks;
    save_schedule(path, &schedule)?;
    Ok(value)
}

/// Build a form draft from CLI flags, falling back to `base` for anything
/// not given.
pub fn build_draft(
    event_id: &str,
    args: &DraftArgs,
    base: Option<&TimelineBlock>,
) -> CliResult<BlockDraft> {
    let status = match &args.status {
        Some(s) => Some(parse_status(s)?),
        None => base.map(|b| b.status),
    };

    let precision = match (&args.precision, base) {
        (Some(p), _) => parse_precision(p)?,
        (None, Some(b)) => precision_of(b.start_time, b.end_time),
        (None, None) => Precision::default(),
    };

    let pick = |flag: &Option<String>, current: Option<&Option<String>>| {
        flag.clone().or_else(|| current.cloned().flatten())
    };

    Ok(BlockDraft {
        event_id: event_id.to_string(),
        title: args
            .title
            .clone()
            .or_else(|| base.map(|b| b.title.clone()))
            .unwrap_or_default(),
        start_time: args
            .start
            .clone()
            .or_else(|| base.map(|b| b.start_time.to_form_input()))
            .unwrap_or_default(),
        end_time: args
            .end
            .clone()
            .or_else(|| base.map(|b| b.end_time.to_form_input()))
            .unwrap_or_default(),
        location: pick(&args.location, base.map(|b| &b.location)),
        description: pick(&args.description, base.map(|b| &b.description)),
        personnel: pick(&args.personnel, base.map(|b| &b.personnel)),
        equipment: pick(&args.equipment, base.map(|b| &b.equipment)),
        notes: pick(&args.notes, base.map(|b| &b.notes)),
        status,
        precision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_falls_back_to_existing_block() {
        let base: TimelineBlock = serde_json::from_str(
            r#"{"id":"b1","event_id":"e1","title":"Setup",
                "start_time":"2024-06-01T09:00:00.000Z","end_time":"2024-06-01T09:30:00.000Z",
                "location":"Main hall","status":"complete"}"#,
        )
        .unwrap();
        let args = DraftArgs {
            title: Some("Setup crew".to_string()),
            ..DraftArgs::default()
        };

        let draft = build_draft("e1", &args, Some(&base)).unwrap();
        assert_eq!(draft.title, "Setup crew");
        assert_eq!(draft.start_time, "2024-06-01T09:00");
        assert_eq!(draft.location.as_deref(), Some("Main hall"));
        assert_eq!(draft.status, Some(BlockStatus::Complete));
    }

    #[test]
    fn draft_keeps_quarter_hour_precision_of_existing_block() {
        let base: TimelineBlock = serde_json::from_str(
            r#"{"id":"b2","event_id":"e1","title":"Doors open",
                "start_time":"2024-06-01T18:00:00.000Z","end_time":"2024-06-01T18:15:00.000Z"}"#,
        )
        .unwrap();

        let draft = build_draft("e1", &DraftArgs::default(), Some(&base)).unwrap();
        assert_eq!(draft.precision, Precision::FifteenMinutes);

        let args = DraftArgs {
            precision: Some("30min".to_string()),
            ..DraftArgs::default()
        };
        let draft = build_draft("e1", &args, Some(&base)).unwrap();
        assert_eq!(draft.precision, Precision::ThirtyMinutes);

        let draft = build_draft("e1", &DraftArgs::default(), None).unwrap();
        assert_eq!(draft.precision, Precision::ThirtyMinutes);
    }

    #[test]
    fn rejects_unknown_precision() {
        assert!(parse_precision("45min").is_err());
        assert_eq!(parse_precision("15min").unwrap(), Precision::FifteenMinutes);
    }
}
