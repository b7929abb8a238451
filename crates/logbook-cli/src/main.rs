#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use cmd::Session;
use logbook_core::config;
use logbook_core::error::ErrorCode;
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "lb: activity log reports for time-boxed projects",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Snapshot JSON with projects, collaborators and activities.
    #[arg(
        long,
        global = true,
        env = "LOGBOOK_INPUT",
        default_value = "logbook.json",
        value_name = "FILE"
    )]
    input: PathBuf,

    /// Pin the clock to an RFC 3339 instant; its offset sets the local day.
    #[arg(long, global = true, value_name = "RFC3339")]
    now: Option<String>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (same as `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "List filtered activities",
        long_about = "List activities matching the filters, newest first.",
        after_help = "EXAMPLES:\n    # Everything in the snapshot\n    lb activities\n\n    # One project over the last seven days\n    lb activities --project p-1 --period last7\n\n    # A custom window, as JSON\n    lb activities --from 2025-01-01 --to 2025-01-31 --format json"
    )]
    Activities(cmd::activities::ActivitiesArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show collaborator recency",
        long_about = "Show when each collaborator last logged an activity, over the whole log.",
        after_help = "EXAMPLES:\n    # Recency of everyone\n    lb recency\n\n    # Only stale collaborators, as of a fixed instant\n    lb recency --status stale --now 2025-02-01T09:00:00+01:00"
    )]
    Recency(cmd::recency::RecencyArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show project cards",
        long_about = "Show one card per project with involved collaborators and filtered activities.",
        after_help = "EXAMPLES:\n    # All projects\n    lb dashboard\n\n    # Ignore filters saved in the snapshot\n    lb dashboard --reset"
    )]
    Dashboard(cmd::dashboard::DashboardArgs),

    #[command(
        next_help_heading = "Reports",
        about = "Export a report document",
        long_about = "Lay out the filtered activities as a tabular or editorial document.",
        after_help = "EXAMPLES:\n    # Table with merged cells\n    lb export tabular\n\n    # Paged document model for a renderer\n    lb export editorial --format json > report.json"
    )]
    Export(cmd::export::ExportArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    lb completions bash\n\n    # Generate zsh completions\n    lb completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOGBOOK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "logbook=debug,info"
        } else {
            "logbook=info,warn"
        })
    });

    let format = env::var("LOGBOOK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Commands::Completions(ref args) = cli.command {
        let mut command = Cli::command();
        cmd::completions::run_completions(args.shell, &mut command, &mut std::io::stdout());
        return Ok(());
    }

    let root = env::current_dir()?;
    let effective = config::resolve_config(&root, cli.json).map_err(|e| {
        let output = output::fallback_output_mode(cli.format, cli.json);
        cmd::fail(output, ErrorCode::ConfigParseError, format!("{e:#}"))
    })?;
    let output = output::resolve_output_mode(cli.format, &effective.resolved_output);

    let session = Session {
        input: cli.input,
        now: cli.now,
        output,
        config: effective.project,
    };

    match cli.command {
        Commands::Activities(ref args) => cmd::activities::run_activities(args, &session),
        Commands::Recency(ref args) => cmd::recency::run_recency(args, &session),
        Commands::Dashboard(ref args) => cmd::dashboard::run_dashboard(args, &session),
        Commands::Export(ref args) => cmd::export::run_export(args, &session),
        Commands::Completions(_) => Ok(()),
    }
}
