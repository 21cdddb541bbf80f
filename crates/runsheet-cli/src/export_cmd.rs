use std::fs;
use std::process::ExitCode;

use anyhow::Context;
use runsheet_core::pdf::render_pdf;
use runsheet_core::{EngineConfig, build_run_of_show, render_text};
use tracing::info;

use crate::cli::ExportArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS};
use crate::shared::load_schedule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Text,
    Pdf,
}

fn parse_document_format(s: &str) -> CliResult<DocumentFormat> {
    match s.to_lowercase().as_str() {
        "text" | "txt" => Ok(DocumentFormat::Text),
        "pdf" => Ok(DocumentFormat::Pdf),
        _ => Err(CliError::input(format!(
            "Invalid format '{}'. Expected: text, pdf",
            s
        ))),
    }
}

pub fn run_export(args: ExportArgs, config: &EngineConfig) -> CliResult<ExitCode> {
    let format = parse_document_format(&args.format)?;
    let schedule = load_schedule(&args.schedule)?;
    let show = build_run_of_show(&schedule.event, &schedule.blocks)?;

    match format {
        DocumentFormat::Text => {
            let text = render_text(&show);
            match &args.out {
                Some(path) => {
                    fs::write(path, text)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), "wrote run of show");
                }
                None => print!("{}", text),
            }
        }
        DocumentFormat::Pdf => {
            let path = args
                .out
                .as_ref()
                .ok_or_else(|| CliError::input("PDF export needs an output path (--out)"))?;
            let pdf = render_pdf(&show, &config.page)?;
            fs::write(path, &pdf.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), pages = pdf.page_count, "wrote run of show");
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
