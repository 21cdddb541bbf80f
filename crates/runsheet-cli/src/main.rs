use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod bucket_cmd;
mod cli;
mod edit_cmd;
mod error;
mod export_cmd;
mod layout_cmd;
mod shared;
mod time_cmd;

use bucket_cmd::run_bucket;
use cli::{Cli, Commands};
use edit_cmd::{run_add, run_delete, run_edit, run_purge_ghosts, run_status};
use error::{CliResult, OutputFormat, output_format_hint, parse_output_format, render_error};
use export_cmd::run_export;
use layout_cmd::run_layout;
use shared::load_config;
use time_cmd::{run_convert, run_round, run_validate};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve `--output-format`, run the command, and render any error in
/// the requested format.
fn dispatch(
    requested: &str,
    run: impl FnOnce(OutputFormat) -> CliResult<ExitCode>,
) -> ExitCode {
    let fallback = output_format_hint(requested);
    let output_format = match parse_output_format(requested) {
        Ok(format) => format,
        Err(err) => return render_error(&err, fallback),
    };

    match run(output_format) {
        Ok(code) => code,
        Err(err) => render_error(&err, output_format),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!(?cli, "parsed arguments");

    let config_path = cli.config.clone();
    let config_path = config_path.as_deref();

    match cli.command {
        Commands::Round(args) => {
            let requested = args.output_format.clone();
            dispatch(&requested, |fmt| run_round(args, fmt))
        }
        Commands::Convert(args) => {
            let requested = args.output_format.clone();
            dispatch(&requested, |fmt| run_convert(args, fmt))
        }
        Commands::Validate(args) => {
            let requested = args.target.output_format.clone();
            dispatch(&requested, |fmt| run_validate(args, fmt))
        }
        Commands::Bucket(args) => {
            let requested = args.output_format.clone();
            dispatch(&requested, |fmt| run_bucket(args, fmt))
        }
        Commands::Layout(args) => {
            let requested = args.target.output_format.clone();
            dispatch(&requested, |fmt| {
                let config = load_config(config_path)?;
                run_layout(args, &config, fmt)
            })
        }
        Commands::Export(args) => {
            let requested = args.output_format.clone();
            dispatch(&requested, |_| {
                let config = load_config(config_path)?;
                run_export(args, &config)
            })
        }
        Commands::Add(args) => {
            let requested = args.target.output_format.clone();
            dispatch(&requested, |fmt| run_add(args, fmt))
        }
        Commands::Edit(args) => {
            let requested = args.target.output_format.clone();
            dispatch(&requested, |fmt| run_edit(args, fmt))
        }
        Commands::Status(args) => {
            let requested = args.target.output_format.clone();
            dispatch(&requested, |fmt| run_status(args, fmt))
        }
        Commands::Delete(args) => {
            let requested = args.target.output_format.clone();
            dispatch(&requested, |fmt| run_delete(args, fmt))
        }
        Commands::PurgeGhosts(args) => {
            let requested = args.target.output_format.clone();
            dispatch(&requested, |fmt| run_purge_ghosts(args, fmt))
        }
    }
}
