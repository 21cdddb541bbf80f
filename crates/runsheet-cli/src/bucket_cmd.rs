use std::fmt::Write as _;
use std::process::ExitCode;

use runsheet_core::{BucketedTimeline, bucketize};

use crate::cli::ScheduleArgs;
use crate::error::{CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{load_schedule, print_json};

pub fn run_bucket(args: ScheduleArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let schedule = load_schedule(&args.schedule)?;
    let timeline = bucketize(
        schedule.event.start_date,
        schedule.event.end_date,
        &schedule.blocks,
    )?;

    match output_format {
        OutputFormat::Json => print_json(&timeline)?,
        OutputFormat::Text => print!("{}", render_bucket_text(&timeline)),
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn render_bucket_text(timeline: &BucketedTimeline) -> String {
    let mut out = String::new();

    for day in &timeline.days {
        let _ = writeln!(out, "{} ({})", day.date, day.blocks.len());
        for block in &day.blocks {
            let _ = writeln!(
                out,
                "  {}  {} [{}]",
                block.time_range(),
                block.title,
                block.status
            );
        }
    }

    let _ = writeln!(out, "ghosts: {}", timeline.ghosts.len());
    for ghost in &timeline.ghosts {
        let _ = writeln!(out, "  {}  {}", ghost.block.id, ghost.reason);
    }

    let _ = writeln!(out, "out of range: {}", timeline.out_of_range.len());
    for block in &timeline.out_of_range {
        let _ = writeln!(out, "  {}  {}", block.id, block.start_time.date());
    }

    out
}
