use std::process::ExitCode;

use runsheet_core::wallclock::{to_form_input, to_stored};
use runsheet_core::{LocalWallClock, RunsheetError, reround, round};
use serde::Serialize;

use crate::cli::{ConvertArgs, DraftCmdArgs, RoundArgs};
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{build_draft, load_schedule, parse_precision, print_json};

#[derive(Debug, Serialize)]
struct RoundOutput {
    precision: String,
    start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<String>,
}

#[derive(Debug, Serialize)]
struct ConvertOutput<'a> {
    input: &'a str,
    to: &'a str,
    value: String,
}

#[derive(Debug, Serialize)]
struct ValidateOutput {
    valid: bool,
    start_time: String,
    end_time: String,
}

pub fn run_round(args: RoundArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let precision = parse_precision(&args.precision)?;
    let start = LocalWallClock::parse_stored(&args.time)?;

    let (start, end) = match &args.end {
        Some(end) => {
            let end = LocalWallClock::parse_stored(end)?;
            let (start, end) = reround(start, end, precision);
            (start, Some(end))
        }
        None => (round(start, precision), None),
    };

    match output_format {
        OutputFormat::Json => print_json(&RoundOutput {
            precision: precision.to_string(),
            start: start.to_stored(),
            end: end.map(|e| e.to_stored()),
        })?,
        OutputFormat::Text => match end {
            Some(end) => println!("{} -> {}", start.to_stored(), end.to_stored()),
            None => println!("{}", start.to_stored()),
        },
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

pub fn run_convert(args: ConvertArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let value = match args.to.to_lowercase().as_str() {
        "stored" => to_stored(&args.value)?,
        "form" => to_form_input(&args.value)?,
        other => {
            return Err(CliError::input(format!(
                "Invalid target '{}'. Expected: form, stored",
                other
            )));
        }
    };

    match output_format {
        OutputFormat::Json => print_json(&ConvertOutput {
            input: &args.value,
            to: &args.to,
            value,
        })?,
        OutputFormat::Text => println!("{}", value),
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

/// Check a draft against the schedule's event without touching the file.
pub fn run_validate(args: DraftCmdArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let schedule = load_schedule(&args.target.schedule)?;
    let draft = build_draft(&schedule.event.id, &args.draft, None)?;
    let valid = draft.validate().map_err(RunsheetError::Validation)?;

    match output_format {
        OutputFormat::Json => print_json(&ValidateOutput {
            valid: true,
            start_time: valid.start_time.to_stored(),
            end_time: valid.end_time.to_stored(),
        })?,
        OutputFormat::Text => println!(
            "ok: {} {} -> {}",
            valid.title,
            valid.start_time.to_stored(),
            valid.end_time.to_stored()
        ),
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
