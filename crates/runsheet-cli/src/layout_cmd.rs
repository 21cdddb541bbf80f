use std::fmt::Write as _;
use std::process::ExitCode;

use chrono::NaiveDate;
use runsheet_core::horizontal::HorizontalLayout;
use runsheet_core::vertical::VerticalLayout;
use runsheet_core::window::{HourWindow, hour_label};
use runsheet_core::{DayBucket, EngineConfig, bucketize};
use serde::Serialize;

use crate::cli::LayoutArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{load_schedule, parse_date, print_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Vertical,
    Horizontal,
}

fn parse_view(s: &str) -> CliResult<View> {
    match s.to_lowercase().as_str() {
        "vertical" => Ok(View::Vertical),
        "horizontal" => Ok(View::Horizontal),
        _ => Err(CliError::input(format!(
            "Invalid view '{}'. Expected: vertical, horizontal",
            s
        ))),
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum DayLayout {
    Vertical(VerticalLayout),
    Horizontal(HorizontalLayout),
}

#[derive(Debug, Serialize)]
struct LayoutOutput {
    date: NaiveDate,
    layout: DayLayout,
}

pub fn run_layout(
    args: LayoutArgs,
    config: &EngineConfig,
    output_format: OutputFormat,
) -> CliResult<ExitCode> {
    let view = parse_view(&args.view)?;
    let only = args.date.as_deref().map(parse_date).transpose()?;

    let schedule = load_schedule(&args.target.schedule)?;
    let timeline = bucketize(
        schedule.event.start_date,
        schedule.event.end_date,
        &schedule.blocks,
    )?;

    let days: Vec<&DayBucket> = match only {
        Some(date) => {
            let day = timeline
                .days
                .iter()
                .find(|d| d.date == date)
                .ok_or_else(|| {
                    CliError::input(format!(
                        "{} is outside the event ({} to {})",
                        date, schedule.event.start_date, schedule.event.end_date
                    ))
                })?;
            vec![day]
        }
        None => timeline.days.iter().collect(),
    };

    let layouts: Vec<LayoutOutput> = days
        .into_iter()
        .map(|day| LayoutOutput {
            date: day.date,
            layout: match view {
                View::Vertical => DayLayout::Vertical(config.vertical.layout_day(&day.blocks)),
                View::Horizontal => {
                    DayLayout::Horizontal(config.horizontal.layout_day(&day.blocks))
                }
            },
        })
        .collect();

    match output_format {
        OutputFormat::Json => print_json(&layouts)?,
        OutputFormat::Text => {
            for day in &layouts {
                print!("{}", render_layout_text(day));
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn window_text(window: HourWindow) -> String {
    format!(
        "{} - {}",
        hour_label(window.start_hour),
        hour_label(window.end_hour)
    )
}

fn render_layout_text(day: &LayoutOutput) -> String {
    let mut out = String::new();

    match &day.layout {
        DayLayout::Vertical(layout) => {
            let _ = writeln!(
                out,
                "{}  {}  height {:.1}",
                day.date,
                window_text(layout.window),
                layout.total_height
            );
            for item in &layout.items {
                let _ = writeln!(
                    out,
                    "  top {:>6.1}  height {:>6.1}  {:<13}  {} ({})",
                    item.geometry.top,
                    item.geometry.height,
                    item.density.label(),
                    item.title,
                    item.time_range
                );
            }
        }
        DayLayout::Horizontal(layout) => {
            let _ = writeln!(out, "{}  {}", day.date, window_text(layout.window));
            for item in &layout.items {
                let _ = writeln!(
                    out,
                    "  left {:>6.2}%  width {:>6.2}%  {:<13}  {}",
                    item.left_pct,
                    item.width_pct,
                    item.density.label(),
                    item.lines.join(" | ")
                );
            }
        }
    }

    out
}
