use std::process::ExitCode;

use runsheet_core::{BlockStore, RunsheetError, TimelineBlock};
use serde::Serialize;

use crate::cli::{DeleteArgs, DraftCmdArgs, EditArgs, PurgeArgs, StatusArgs};
use crate::error::{CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{build_draft, parse_status, print_json, with_service};

#[derive(Debug, Serialize)]
struct RemovedOutput {
    removed: usize,
    ids: Vec<String>,
}

fn report_block(verb: &str, block: &TimelineBlock, output_format: OutputFormat) -> CliResult<()> {
    match output_format {
        OutputFormat::Json => print_json(block),
        OutputFormat::Text => {
            println!(
                "{} {}  {} {}  {} [{}]",
                verb,
                block.id,
                block.start_time.date(),
                block.time_range(),
                block.title,
                block.status
            );
            Ok(())
        }
    }
}

fn report_removed(ids: Vec<String>, removed: usize, output_format: OutputFormat) -> CliResult<()> {
    match output_format {
        OutputFormat::Json => print_json(&RemovedOutput { removed, ids }),
        OutputFormat::Text => {
            println!("removed {}", removed);
            for id in ids {
                println!("  {}", id);
            }
            Ok(())
        }
    }
}

pub fn run_add(args: DraftCmdArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let block = with_service(&args.target.schedule, |schedule, service| {
        let draft = build_draft(&schedule.event.id, &args.draft, None)?;
        Ok(service.create(&draft)?)
    })?;

    report_block("added", &block, output_format)?;
    Ok(ExitCode::from(EXIT_SUCCESS))
}

/// Fields not given on the command line keep their current values.
pub fn run_edit(args: EditArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let block = with_service(&args.target.schedule, |schedule, service| {
        let current = service
            .store()
            .get(&args.id)?
            .ok_or_else(|| RunsheetError::NotFound(args.id.clone()))?;
        let draft = build_draft(&schedule.event.id, &args.draft, Some(&current))?;
        Ok(service.edit(&args.id, &draft)?)
    })?;

    report_block("updated", &block, output_format)?;
    Ok(ExitCode::from(EXIT_SUCCESS))
}

pub fn run_status(args: StatusArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let status = parse_status(&args.status)?;
    let block = with_service(&args.target.schedule, |_, service| {
        Ok(service.set_status(&args.id, status)?)
    })?;

    report_block("updated", &block, output_format)?;
    Ok(ExitCode::from(EXIT_SUCCESS))
}

pub fn run_delete(args: DeleteArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    with_service(&args.target.schedule, |_, service| {
        Ok(service.delete(&args.id)?)
    })?;

    report_removed(vec![args.id], 1, output_format)?;
    Ok(ExitCode::from(EXIT_SUCCESS))
}

/// Without `--id`, every ghost and out-of-range block is removed.
pub fn run_purge_ghosts(args: PurgeArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let (ids, removed) = with_service(&args.target.schedule, |schedule, service| {
        let ids = if args.ids.is_empty() {
            service.load(&schedule.event)?.cleanup_ids()
        } else {
            args.ids.clone()
        };
        let removed = service.purge(&ids)?;
        Ok((ids, removed))
    })?;

    report_removed(ids, removed, output_format)?;
    Ok(ExitCode::from(EXIT_SUCCESS))
}
