use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use linepatch::diff::line_stats;
use linepatch::logging::init_logging;
use linepatch::{apply_request, load_from_path, BatchResult, FileResult, FileStatus, LocalFs};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "linepatch")]
#[command(about = "Batch line-anchored text patching", long_about = None)]
#[command(version)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply an edit request (JSON or TOML) to a workspace
    Apply {
        /// Path to the request file
        request: PathBuf,

        /// Workspace root that request paths are relative to
        /// (defaults to $LINEPATCH_ROOT, then the current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Dry run - compute results and diffs without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Omit unified diffs from the report
        #[arg(long)]
        no_diff: bool,

        /// Print the result document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load and validate an edit request without applying it
    Check {
        /// Path to the request file
        request: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Apply {
            request,
            root,
            dry_run,
            no_diff,
            json,
        } => cmd_apply(request, root, dry_run, no_diff, json),

        Commands::Check { request } => cmd_check(request),
    }
}

/// Resolve the workspace root.
///
/// Priority order:
/// 1. Explicit --root flag
/// 2. LINEPATCH_ROOT environment variable
/// 3. Current directory
fn resolve_root(cli_root: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = cli_root {
        return Ok(path);
    }

    if let Ok(env_path) = env::var("LINEPATCH_ROOT") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }

    env::current_dir().context("could not determine the current directory")
}

/// Print a unified diff with removed lines red and added lines green.
fn display_diff(diff: &str) {
    for line in diff.lines() {
        let styled = if line.starts_with("---") || line.starts_with("+++") {
            line.dimmed()
        } else if line.starts_with("@@") {
            line.cyan()
        } else if line.starts_with('-') {
            line.red()
        } else if line.starts_with('+') {
            line.green()
        } else {
            line.normal()
        };
        println!("{styled}");
    }
}

fn print_result(result: &FileResult, show_diff: bool) {
    let message = result.message.as_deref().unwrap_or("");
    match result.status {
        FileStatus::Success => {
            let stats = result
                .diff
                .as_deref()
                .map(line_stats)
                .map(|(added, removed)| format!(" (+{added} -{removed})"))
                .unwrap_or_default();
            println!("{} {}{}: {}", "✓".green(), result.path, stats, message);
            if show_diff {
                if let Some(diff) = result.diff.as_deref().filter(|d| !d.is_empty()) {
                    display_diff(diff);
                }
            }
        }
        FileStatus::Skipped => {
            println!("{} {}: Skipped {}", "⊘".cyan(), result.path, message);
        }
        FileStatus::Failed => {
            eprintln!("{} {}: Failed - {}", "✗".red(), result.path, message);
        }
    }
}

fn cmd_apply(
    request_path: PathBuf,
    root: Option<PathBuf>,
    dry_run: bool,
    no_diff: bool,
    json: bool,
) -> Result<()> {
    let root = resolve_root(root)?;
    let mut request = load_from_path(&request_path)?;
    if dry_run {
        request.dry_run = true;
    }
    if no_diff {
        request.output_diff = false;
    }

    let fs = LocalFs::new(&root)
        .with_context(|| format!("invalid workspace root {}", root.display()))?;
    let batch = BatchResult::from(apply_request(&request, &fs)?);

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        println!("Workspace: {}", fs.workspace_root().display());
        if request.dry_run {
            println!("{}", "[DRY RUN - no files will be modified]".cyan());
        }
        println!();

        for result in &batch.results {
            print_result(result, request.output_diff);
        }

        println!();
        println!("{}", "Summary:".bold());
        println!(
            "  {} succeeded",
            batch.count(FileStatus::Success).to_string().green()
        );
        println!(
            "  {} skipped",
            batch.count(FileStatus::Skipped).to_string().cyan()
        );
        println!(
            "  {} failed",
            batch.count(FileStatus::Failed).to_string().red()
        );
    }

    if batch.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_check(request_path: PathBuf) -> Result<()> {
    let request = load_from_path(&request_path)?;

    let files = linepatch::group_by_path(&request.changes);
    println!(
        "{} {}: {} change(s) across {} file(s)",
        "✓".green(),
        request_path.display(),
        request.changes.len(),
        files.len()
    );
    for group in files {
        println!("  {} ({})", group.path, group.changes.len());
    }

    Ok(())
}
