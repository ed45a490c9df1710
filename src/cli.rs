//! Command-line interface for docgen.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use crate::codebase::CodebaseAnalyzer;
use crate::config::Config;
use crate::report::{self, OutputFormat};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_NO_SOURCES: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Extract the structure of a TypeScript/JavaScript codebase.
///
/// docgen walks a project, parses every source file and reports its
/// functions, classes, interfaces, exports, dependencies and detected
/// frameworks, ready to feed a documentation generator.
#[derive(Parser)]
#[command(name = "docgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a project directory
    Analyze(AnalyzeArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Project root directory
    pub path: PathBuf,

    /// Additional glob pattern to exclude (repeatable)
    #[arg(short, long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Output format (default: pretty, or the config file's value)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to a YAML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum number of files parsed concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Keep private functions, methods and properties
    #[arg(long)]
    pub include_private: bool,
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    let config = match &args.config {
        Some(path) => Config::parse_file(path)?,
        None => Config::default(),
    };

    let metadata = match std::fs::metadata(&args.path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };
    if !metadata.is_dir() {
        eprintln!("Error: {:?} is not a directory", args.path);
        return Ok(EXIT_ERROR);
    }

    let mut exclude = config.exclude_patterns.clone();
    exclude.extend(args.exclude.iter().cloned());

    let analyzer = CodebaseAnalyzer::new(&args.path)
        .exclude_patterns(exclude)
        .jobs(args.jobs.or(config.jobs));

    let structure = match analyzer.run() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_NO_SOURCES);
        }
    };

    let structure = if args.include_private || config.include_private {
        structure
    } else {
        structure.without_private()
    };

    let format = args.format.or(config.format).unwrap_or_default();
    let root = args.path.to_string_lossy().to_string();

    match &args.output {
        Some(path) => {
            colored::control::set_override(false);
            let file = File::create(path)
                .with_context(|| format!("cannot create output file {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_report(&mut out, format, &root, &structure)?;
            out.flush()?;
            info!("wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_report(&mut out, format, &root, &structure)?;
        }
    }

    Ok(EXIT_SUCCESS)
}

fn write_report<W: Write>(
    out: &mut W,
    format: OutputFormat,
    root: &str,
    structure: &crate::analysis::CodeStructure,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => report::write_json(out, structure),
        OutputFormat::Pretty => report::write_pretty(out, root, structure),
    }
}
