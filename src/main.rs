use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use web2native::archive;
use web2native::{convert_project, ConvertOptions, RenameTables, RunReport};

/// Convert React web sources (JSX + CSS) into React Native sources.
#[derive(Parser, Debug)]
#[command(name = "web2native", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a source directory into an output directory
    Convert {
        /// Input directory (e.g. the project's `src/`)
        input: PathBuf,
        /// Output directory; created if missing
        output: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Convert a zipped project into a zipped output tree
    ConvertZip {
        /// Project archive; `src/` inside it is used when present
        archive: PathBuf,
        /// Output archive path
        output: PathBuf,
        /// Scratch directory for extraction
        #[arg(long, default_value_os_t = std::env::temp_dir())]
        work_dir: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON file overriding or extending the rename tables
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Worker threads (0 = CPUs - 1)
    #[arg(long, default_value_t = 0)]
    threads: usize,
    /// Skip files matched by .gitignore
    #[arg(long)]
    respect_gitignore: bool,
    /// Skip files larger than this many bytes
    #[arg(long, default_value_t = ConvertOptions::default().max_file_bytes)]
    max_file_bytes: u64,
    /// Report format written to stdout
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

impl RunArgs {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            threads: self.threads,
            respect_gitignore: self.respect_gitignore,
            max_file_bytes: self.max_file_bytes,
        }
    }

    fn tables(&self) -> Result<RenameTables> {
        match &self.rules {
            Some(path) => RenameTables::load(path)
                .with_context(|| format!("loading rules from {}", path.display())),
            None => Ok(RenameTables::default()),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert { input, output, run } => {
            let tables = run.tables()?;
            let report = convert_project(&input, &output, &run.options(), &tables)
                .with_context(|| format!("converting {}", input.display()))?;
            print_report(&report, run.report)?;
            report.ensure_usable()?;
        }
        Command::ConvertZip {
            archive: input,
            output,
            work_dir,
            run,
        } => {
            let tables = run.tables()?;
            let report =
                archive::convert_archive(&input, &output, &work_dir, &run.options(), &tables)
                    .with_context(|| format!("converting archive {}", input.display()))?;
            print_report(&report, run.report)?;
        }
    }
    Ok(())
}

fn print_report(report: &RunReport, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        ReportFormat::Text => {
            for file in &report.converted {
                println!("converted {} -> {}", file.source, file.output);
            }
            for failure in &report.failures {
                println!(
                    "skipped   {} ({:?}): {}",
                    display_path(&failure.path),
                    failure.kind,
                    failure.message
                );
            }
            println!(
                "{} converted, {} skipped, {} ignored",
                report.converted.len(),
                report.failures.len(),
                report.ignored
            );
        }
    }
    Ok(())
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<walk>"
    } else {
        path
    }
}
