use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Event run-of-show timeline tool
#[derive(Parser, Debug)]
#[command(name = "runsheet", version)]
#[command(about = "Event run-of-show timeline tool")]
pub struct Cli {
    /// Engine config file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Round a time (or start/end pair) to a precision
    Round(RoundArgs),
    /// Convert between form input and stored time representations
    Convert(ConvertArgs),
    /// Check a block without saving it
    Validate(DraftCmdArgs),
    /// Group an event's blocks by day and list ghost blocks
    Bucket(ScheduleArgs),
    /// Compute vertical or horizontal layout geometry
    Layout(LayoutArgs),
    /// Export the run of show as text or PDF
    Export(ExportArgs),
    /// Add a block to the schedule
    Add(DraftCmdArgs),
    /// Edit a block in place
    Edit(EditArgs),
    /// Change a block's status
    Status(StatusArgs),
    /// Delete a block
    Delete(DeleteArgs),
    /// Delete ghost and out-of-range blocks
    PurgeGhosts(PurgeArgs),
}

#[derive(clap::Args, Debug)]
pub struct RoundArgs {
    /// Time to round (form or stored format)
    pub time: String,

    /// End time; rounds the pair and keeps at least one precision unit
    #[arg(long)]
    pub end: Option<String>,

    /// Precision: 15min, 30min
    #[arg(short, long, default_value = "30min")]
    pub precision: String,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Value to convert
    pub value: String,

    /// Target representation: form, stored
    #[arg(long, default_value = "stored")]
    pub to: String,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct ScheduleArgs {
    /// Schedule file (JSON with `event` and `blocks`)
    #[arg(short, long)]
    pub schedule: PathBuf,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

/// Block form fields.
#[derive(clap::Args, Debug, Default)]
pub struct DraftArgs {
    #[arg(long)]
    pub title: Option<String>,

    /// Start time, e.g. 2024-06-01T09:00
    #[arg(long)]
    pub start: Option<String>,

    /// End time, e.g. 2024-06-01T09:30
    #[arg(long)]
    pub end: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub personnel: Option<String>,

    #[arg(long)]
    pub equipment: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Status: pending, in-progress, complete, cancelled
    #[arg(long)]
    pub status: Option<String>,

    /// Precision: 15min, 30min (default 30min; edit uses the stored
    /// block's own precision)
    #[arg(short, long)]
    pub precision: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DraftCmdArgs {
    #[command(flatten)]
    pub target: ScheduleArgs,

    #[command(flatten)]
    pub draft: DraftArgs,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    #[command(flatten)]
    pub target: ScheduleArgs,

    /// Id of the block to edit
    #[arg(long)]
    pub id: String,

    #[command(flatten)]
    pub draft: DraftArgs,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub target: ScheduleArgs,

    #[arg(long)]
    pub id: String,

    /// New status: pending, in-progress, complete, cancelled
    #[arg(long)]
    pub status: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: ScheduleArgs,

    #[arg(long)]
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct PurgeArgs {
    #[command(flatten)]
    pub target: ScheduleArgs,

    /// Only delete these ids (default: every ghost and out-of-range block)
    #[arg(long = "id")]
    pub ids: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub target: ScheduleArgs,

    /// Layout: vertical, horizontal
    #[arg(long, default_value = "vertical")]
    pub view: String,

    /// Only this day (YYYY-MM-DD); default is every day of the event
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Schedule file (JSON with `event` and `blocks`)
    #[arg(short, long)]
    pub schedule: PathBuf,

    /// Document format: text, pdf
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Output path (required for pdf; text goes to stdout when omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Output format for errors: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}
